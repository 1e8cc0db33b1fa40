//! Sample buffer management and operations

use crate::{CoreError, Result, Traced};
use dasp::Sample;

/// Generic sample buffer for audio data
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer<T> {
    data: Vec<T>,
    sample_rate: u32,
}

impl<T> SampleBuffer<T> {
    /// Create a buffer from existing data
    pub fn from_data(data: Vec<T>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Traced::new(CoreError::InvalidSampleRate {
                rate: sample_rate,
            }));
        }

        Ok(Self { data, sample_rate })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Fail unless the buffer was sampled at `expected` Hz
    pub fn ensure_sample_rate(&self, expected: u32) -> Result<()> {
        if self.sample_rate != expected {
            return Err(Traced::new(CoreError::SampleRateMismatch {
                expected,
                actual: self.sample_rate,
            }));
        }
        Ok(())
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Playback length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.data.len() as f64 / f64::from(self.sample_rate)
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the buffer and return its samples
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

/// Unsigned 8-bit PCM, 128 is silence
pub type PcmBuffer = SampleBuffer<u8>;

impl PcmBuffer {
    /// Samples re-centred around zero
    pub fn to_signed(&self) -> Vec<i8> {
        self.data.iter().map(|s| s.to_sample::<i8>()).collect()
    }

    /// Build an unsigned buffer from signed samples
    pub fn from_signed(samples: &[i8], sample_rate: u32) -> Result<Self> {
        let data = samples.iter().map(|s| s.to_sample::<u8>()).collect();
        Self::from_data(data, sample_rate)
    }
}
