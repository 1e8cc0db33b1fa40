//! AFSK Core - shared primitives for the AFSK/AX.25 codec
//!
//! This crate provides the PCM sample buffer, the shared waveform table,
//! the CRC-16-CCITT frame check sequence and the traced error wrapper
//! used by the frame and modem crates.

pub mod buffer;
pub mod crc;
pub mod error;
pub mod trace;
pub mod waveform;

pub use error::{CoreError, Result};
pub use trace::{TraceEntry, TraceResultExt, Traced};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        buffer::{PcmBuffer, SampleBuffer},
        crc::{crc16_ccitt, Crc16},
        error::{CoreError, Result},
        trace::{TraceEntry, TraceResultExt, Traced},
        waveform::WaveformTable,
    };
}
