//! Transmitter configuration and implementation

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use afsk_core::buffer::PcmBuffer;
use afsk_frame::prelude::*;
use afsk_modem::prelude::*;

use crate::config::StationConfig;

/// Transmitter command line
#[derive(Debug, Clone, Parser)]
pub struct TxArgs {
    /// Output audio file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Information field to send
    #[arg(short, long)]
    pub message: String,

    /// Station configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Station callsign
    #[arg(short, long)]
    pub callsign: Option<String>,

    /// Station SSID (0-15)
    #[arg(short, long)]
    pub ssid: Option<u8>,

    /// Digipeater path, comma separated (e.g. WIDE1-1,WIDE2-1)
    #[arg(short, long, value_delimiter = ',')]
    pub path: Vec<String>,

    /// Idle bytes before the opening flag
    #[arg(long)]
    pub begin_markers: Option<usize>,

    /// Flags after the frame
    #[arg(long)]
    pub end_markers: Option<usize>,

    /// Peak amplitude as a fraction of full scale
    #[arg(long)]
    pub headroom: Option<f64>,
}

impl TxArgs {
    /// Station settings from the config file, overridden by flags
    pub fn station(&self) -> Result<StationConfig> {
        let mut station = match &self.config {
            Some(path) => StationConfig::from_file(path)?,
            None => StationConfig::default(),
        };

        if let Some(callsign) = &self.callsign {
            station.callsign = callsign.clone();
        }
        if let Some(ssid) = self.ssid {
            station.ssid = ssid;
        }
        if !self.path.is_empty() {
            station.path = self.path.clone();
        }
        if let Some(begin) = self.begin_markers {
            station.modem.begin_markers = begin;
        }
        if let Some(end) = self.end_markers {
            station.modem.end_markers = end;
        }
        if let Some(headroom) = self.headroom {
            station.modem = station.modem.with_headroom(headroom)?;
        }

        Ok(station)
    }
}

/// APRS transmitter
pub struct Transmitter {
    station: StationConfig,
    modulator: AfskModulator,
}

impl Transmitter {
    /// Create a new transmitter with the given configuration
    pub fn new(station: StationConfig) -> Result<Self> {
        let modulator = AfskModulator::new(station.modem.clone())?;
        Ok(Self { station, modulator })
    }

    /// Frame octets for `message`
    pub fn encode(&self, message: &[u8]) -> Result<Vec<u8>> {
        let source = self.station.source()?;
        let mut builder = FrameBuilder::new(source.callsign(), source.ssid());
        for hop in self.station.digipeaters()? {
            builder = builder.digipeater(hop.callsign(), hop.ssid());
        }

        let packet = builder
            .build(message)
            .context("Failed to build APRS packet")?;
        Ok(packet.to_bytes()?)
    }

    /// Frame and modulate `message`
    pub fn transmit(&self, message: &[u8]) -> Result<PcmBuffer> {
        let octets = self.encode(message)?;
        debug!("Frame size: {} bytes", octets.len());

        let samples = self.modulator.modulate(&octets)?;
        info!(
            "Modulated {} bytes into {} samples ({:.2} s)",
            octets.len(),
            samples.len(),
            samples.duration_secs()
        );
        Ok(samples)
    }
}
