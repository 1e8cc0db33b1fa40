//! Receiver configuration and implementation

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

use afsk_frame::prelude::*;
use afsk_modem::prelude::*;

/// Receiver command line
#[derive(Debug, Clone, Parser)]
pub struct RxArgs {
    /// Input audio file (mono WAV, 9600 Hz)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Print the decoded packet as JSON
    #[arg(long)]
    pub json: bool,

    /// Accept frames whose checksum does not match
    #[arg(long)]
    pub no_fcs_check: bool,
}

/// A packet together with where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reception {
    /// Sample offset of the winning bit phase
    pub offset: usize,
    pub packet: AprsPacket,
}

impl fmt::Display for Reception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.packet.source)?;
        for (i, hop) in self.packet.path.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { '>' } else { ',' }, hop)?;
        }
        write!(f, ": {}", String::from_utf8_lossy(&self.packet.payload))
    }
}

/// APRS receiver
pub struct Receiver {
    search: PhaseSearch,
}

impl Receiver {
    /// Create a receiver; `verify_fcs` gates the phase search on the frame checksum
    pub fn new(verify_fcs: bool) -> Self {
        let search = if verify_fcs {
            PhaseSearch::new()
        } else {
            PhaseSearch::new().without_fcs_check()
        };
        Self { search }
    }

    /// Demodulate and decode the first frame in `samples`
    pub fn receive(&self, samples: &[u8]) -> Result<Reception> {
        let found = self
            .search
            .search(samples)
            .context("No AFSK frame in input")?;
        info!(
            "Frame of {} bytes at offset {}",
            found.octets.len(),
            found.offset
        );

        let packet = decode_frame(&found.octets).context("Failed to decode AX.25 frame")?;
        Ok(Reception {
            offset: found.offset,
            packet,
        })
    }
}
