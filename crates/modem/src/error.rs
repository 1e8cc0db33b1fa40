//! Error types for AFSK Modem

use afsk_core::{CoreError, Traced};
use thiserror::Error;

/// Modem error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModemError {
    #[error("No frame found after trying {offsets} sample offsets")]
    NotFound { offsets: usize },

    #[error("Invalid modulation parameters: {msg}")]
    InvalidParameters { msg: String },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for AFSK Modem operations
pub type Result<T> = std::result::Result<T, Traced<ModemError>>;
