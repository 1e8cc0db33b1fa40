//! AFSK Frame - AX.25 UI framing for APRS
//!
//! Builds and parses the octets that travel between flags: destination,
//! source and optional digipeater address fields, control and protocol ID,
//! the information field and the CRC-16-CCITT frame check sequence.

pub mod address;
pub mod error;
pub mod frame;

pub use afsk_core::crc;
pub use error::{FrameError, Result};
pub use frame::{decode_frame, encode_frame};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        address::Address,
        error::{FrameError, Result},
        frame::{decode_frame, encode_frame, AprsPacket, FrameBuilder},
    };
}
