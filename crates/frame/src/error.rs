//! Error types for AX.25 framing

use afsk_core::Traced;
use thiserror::Error;

/// Frame processing error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid frame format: {msg}")]
    InvalidFormat { msg: String },

    #[error("Frame checksum mismatch: computed {expected:#06x}, received {actual:#06x}")]
    InvalidChecksum { expected: u16, actual: u16 },
}

impl FrameError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        FrameError::InvalidFormat { msg: msg.into() }
    }
}

/// Result type for AX.25 frame operations
pub type Result<T> = std::result::Result<T, Traced<FrameError>>;
