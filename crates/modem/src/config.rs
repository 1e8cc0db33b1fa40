//! Fixed Bell 202 modem parameters

use crate::{ModemError, Result};
use afsk_core::Traced;
use serde::{Deserialize, Serialize};

/// Symbol rate
pub const BAUD_RATE: u32 = 1200;

/// Samples per baud; the discriminator window is exactly one baud
pub const SAMPLES_PER_BIT: usize = 8;

/// PCM sample rate
pub const SAMPLE_RATE: u32 = BAUD_RATE * SAMPLES_PER_BIT as u32;

/// Lower tone in Hz, also the tone a transmission starts on
pub const LOW_TONE_HZ: u32 = 1200;

/// Upper tone in Hz
pub const HIGH_TONE_HZ: u32 = 2200;

/// HDLC frame delimiter
pub const FLAG: u8 = 0x7E;

/// Pre-sync filler
pub const IDLE: u8 = 0x00;

/// Flag-to-flag spans shorter than this are treated as noise
pub const MIN_FRAME_LEN: usize = 16;

/// Default idle bytes before the opening flag
pub const DEFAULT_BEGIN_MARKERS: usize = 8;

/// Default closing flags
pub const DEFAULT_END_MARKERS: usize = 3;

/// Default fraction of full scale used by the synthesizer
pub const DEFAULT_HEADROOM: f64 = 0.8;

/// One of the two AFSK tones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Low,
    High,
}

impl Tone {
    /// Tone frequency in Hz
    pub fn frequency(self) -> u32 {
        match self {
            Tone::Low => LOW_TONE_HZ,
            Tone::High => HIGH_TONE_HZ,
        }
    }

    /// The other tone
    pub fn toggled(self) -> Self {
        match self {
            Tone::Low => Tone::High,
            Tone::High => Tone::Low,
        }
    }
}

/// AFSK configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AfskConfig {
    /// Idle bytes sent before the opening flag
    pub begin_markers: usize,
    /// Flags sent after the frame
    pub end_markers: usize,
    /// Peak amplitude as a fraction of full scale
    pub headroom: f64,
}

impl Default for AfskConfig {
    fn default() -> Self {
        Self::bell_202()
    }
}

impl AfskConfig {
    /// Create Bell 202 compatible AFSK configuration (1200 baud)
    pub fn bell_202() -> Self {
        Self {
            begin_markers: DEFAULT_BEGIN_MARKERS,
            end_markers: DEFAULT_END_MARKERS,
            headroom: DEFAULT_HEADROOM,
        }
    }

    /// Set the number of leading idle bytes and trailing flags
    pub fn with_markers(mut self, begin_markers: usize, end_markers: usize) -> Self {
        self.begin_markers = begin_markers;
        self.end_markers = end_markers;
        self
    }

    /// Set the synthesizer headroom
    pub fn with_headroom(mut self, headroom: f64) -> Result<Self> {
        self.headroom = headroom;
        self.validate()?;
        Ok(self)
    }

    /// Check that the configuration can be synthesized
    pub fn validate(&self) -> Result<()> {
        if self.headroom.is_nan() || self.headroom <= 0.0 || self.headroom > 1.0 {
            return Err(Traced::new(ModemError::InvalidParameters {
                msg: format!("Headroom must be in (0, 1]: {}", self.headroom),
            }));
        }
        Ok(())
    }

    /// Samples emitted per encoded bit
    pub fn samples_per_bit(&self) -> usize {
        SAMPLES_PER_BIT
    }

    /// PCM sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Symbol rate in baud
    pub fn baud_rate(&self) -> u32 {
        BAUD_RATE
    }
}
