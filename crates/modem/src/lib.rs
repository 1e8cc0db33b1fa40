//! AFSK Modem - 1200 baud Bell 202 style AFSK over 8-bit PCM
//!
//! The modulator turns already-framed octets into samples using HDLC bit
//! stuffing, NRZI line coding and phase-accumulator tone synthesis. The
//! demodulator runs an 8-sample tone discriminator once per baud and a
//! small state machine that finds flags, drops stuffed bits and rebuilds
//! bytes. Because the receiver does not know where a bit starts, the
//! phase search retries the state machine at every sample offset.

pub mod config;
pub mod demodulator;
pub mod discriminator;
pub mod error;
pub mod modulator;
pub mod search;

pub use error::{ModemError, Result};

use afsk_core::buffer::PcmBuffer;
use config::AfskConfig;
use modulator::AfskModulator;
use search::PhaseSearch;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        config::{AfskConfig, Tone},
        demodulator::{AfskDemodulator, DemodState, Event},
        discriminator::{discriminate, discriminate_at},
        error::{ModemError, Result},
        modulator::AfskModulator,
        search::{Demodulated, PhaseSearch},
    };
}

/// Modulate framed octets with the given number of idle and closing flag markers
pub fn modulate(octets: &[u8], begin_markers: usize, end_markers: usize) -> Result<PcmBuffer> {
    let config = AfskConfig::bell_202().with_markers(begin_markers, end_markers);
    AfskModulator::new(config)?.modulate(octets)
}

/// Recover the first valid frame from samples of unknown bit phase
pub fn demodulate(samples: &[u8]) -> Result<Vec<u8>> {
    PhaseSearch::new()
        .search(samples)
        .map(|demodulated| demodulated.octets)
}
