//! Bit-phase search
//!
//! The receiver does not know which sample a baud starts on, so the state
//! machine is run once per candidate offset. The first offset that yields
//! a frame wins.

use crate::config::{MIN_FRAME_LEN, SAMPLES_PER_BIT};
use crate::demodulator::{AfskDemodulator, Event};
use crate::discriminator::WINDOW;
use crate::{ModemError, Result};
use afsk_core::crc::fcs_matches;
use afsk_core::Traced;

/// A frame recovered from one sample offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demodulated {
    /// Sample offset the frame was found at
    pub offset: usize,
    /// Frame octets between the flags, check sequence included
    pub octets: Vec<u8>,
}

/// Runs the demodulator over every bit phase
#[derive(Debug, Clone)]
pub struct PhaseSearch {
    min_frame_len: usize,
    verify_fcs: bool,
}

impl Default for PhaseSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSearch {
    /// Search accepting frames of at least [`MIN_FRAME_LEN`] octets with a valid check sequence
    pub fn new() -> Self {
        Self {
            min_frame_len: MIN_FRAME_LEN,
            verify_fcs: true,
        }
    }

    /// Accept any long enough flag-to-flag span, valid check sequence or not
    pub fn without_fcs_check(mut self) -> Self {
        self.verify_fcs = false;
        self
    }

    /// Change the shortest accepted frame
    pub fn with_min_frame_len(mut self, min_frame_len: usize) -> Self {
        self.min_frame_len = min_frame_len;
        self
    }

    fn accepts(&self, frame: &[u8]) -> bool {
        frame.len() >= self.min_frame_len && (!self.verify_fcs || fcs_matches(frame))
    }

    /// Run one demodulator starting `offset` samples in
    pub fn run_at(&self, samples: &[u8], offset: usize) -> Option<Vec<u8>> {
        let samples = samples.get(offset..)?;
        let mut demod = AfskDemodulator::new();
        let mut frame = Vec::new();

        for window in samples.chunks_exact(WINDOW) {
            match demod.step(window) {
                Some(Event::Flag) => {
                    if self.accepts(&frame) {
                        return Some(frame);
                    }
                    if !frame.is_empty() {
                        tracing::trace!(offset, len = frame.len(), "discarding candidate frame");
                    }
                    frame.clear();
                }
                Some(Event::Byte(byte)) => frame.push(byte),
                Some(Event::Abort) => frame.clear(),
                Some(Event::Skip) | None => {}
            }
        }
        None
    }

    /// Find the first frame, trying offsets in increasing order
    pub fn search(&self, samples: &[u8]) -> Result<Demodulated> {
        match self.first_hit(samples) {
            Some(found) => {
                tracing::debug!(
                    offset = found.offset,
                    len = found.octets.len(),
                    "frame found"
                );
                Ok(found)
            }
            None => {
                tracing::debug!(samples = samples.len(), "no frame at any offset");
                Err(Traced::new(ModemError::NotFound {
                    offsets: SAMPLES_PER_BIT,
                }))
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn first_hit(&self, samples: &[u8]) -> Option<Demodulated> {
        (0..SAMPLES_PER_BIT).find_map(|offset| {
            self.run_at(samples, offset)
                .map(|octets| Demodulated { offset, octets })
        })
    }

    #[cfg(feature = "parallel")]
    fn first_hit(&self, samples: &[u8]) -> Option<Demodulated> {
        use rayon::prelude::*;

        let hits: Vec<Option<Vec<u8>>> = (0..SAMPLES_PER_BIT)
            .into_par_iter()
            .map(|offset| self.run_at(samples, offset))
            .collect();

        hits.into_iter()
            .enumerate()
            .find_map(|(offset, octets)| octets.map(|octets| Demodulated { offset, octets }))
    }
}
