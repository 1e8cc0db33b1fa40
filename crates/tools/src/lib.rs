//! AFSK Tools library
//!
//! Thin wrappers that connect the frame codec and modem to WAV files,
//! TOML station configuration and the `afsk` command line.

pub mod common;
pub mod config;
pub mod rx;
pub mod selftest;
pub mod tx;

pub use common::{init_logging, read_wav_file, write_wav_file};
pub use config::StationConfig;
pub use rx::{Receiver, Reception, RxArgs};
pub use selftest::{SelftestArgs, SelftestReport};
pub use tx::{Transmitter, TxArgs};
