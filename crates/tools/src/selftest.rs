//! End-to-end self test
//!
//! Encodes a packet, checks the frame codec on its own, then modulates it,
//! optionally passes the samples through a WAV file, and demodulates at
//! every bit phase.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use afsk_core::buffer::PcmBuffer;
use afsk_frame::prelude::*;
use afsk_modem::config::SAMPLES_PER_BIT;
use afsk_modem::prelude::*;

use crate::common::{read_wav_file, write_wav_file};
use crate::config::StationConfig;
use crate::tx::Transmitter;

/// Self test command line
#[derive(Debug, Clone, Parser)]
pub struct SelftestArgs {
    /// Station callsign
    #[arg(short, long, default_value = "NOCALL")]
    pub callsign: String,

    /// Station SSID (0-15)
    #[arg(short, long, default_value_t = 0)]
    pub ssid: u8,

    /// Information field to send
    #[arg(short, long, default_value = ">afsk selftest")]
    pub message: String,

    /// Keep the modulated audio in this WAV file and demodulate from it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Outcome at one bit phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShiftResult {
    pub shift: usize,
    /// Demodulated octets equal the transmitted frame
    pub recovered: bool,
    /// Decoded fields equal the transmitted ones
    pub decoded: bool,
}

/// Self test results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelftestReport {
    /// Codec round trip without the modem
    pub codec: bool,
    pub shifts: Vec<ShiftResult>,
}

impl SelftestReport {
    /// Shifts that recovered the frame, and shifts that did not
    pub fn phase_counts(&self) -> (usize, usize) {
        let passed = self.shifts.iter().filter(|s| s.recovered).count();
        (passed, self.shifts.len() - passed)
    }

    /// Among recovered shifts, those whose decoded fields match, and those that do not
    pub fn decode_counts(&self) -> (usize, usize) {
        let recovered = self.shifts.iter().filter(|s| s.recovered);
        let passed = recovered.clone().filter(|s| s.decoded).count();
        (passed, recovered.count() - passed)
    }

    /// The codec round trip passed, some phase recovered the frame and
    /// every recovered frame decoded
    ///
    /// Phases about half a bit away from the transmitter's never lock, so
    /// failed shifts alone do not fail the test.
    pub fn success(&self) -> bool {
        let (decoded, undecoded) = self.decode_counts();
        self.codec && decoded > 0 && undecoded == 0
    }
}

fn percent(passed: usize, failed: usize) -> f64 {
    if passed + failed == 0 {
        0.0
    } else {
        100.0 * passed as f64 / (passed + failed) as f64
    }
}

impl fmt::Display for SelftestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Codec round trip: {}",
            if self.codec { "SUCCESS" } else { "FAILURE" }
        )?;
        let (passed, failed) = self.phase_counts();
        writeln!(
            f,
            "1. Phase shift: {} PASSED, {} FAILED ({:.1}%)",
            passed,
            failed,
            percent(passed, failed)
        )?;
        let (passed, failed) = self.decode_counts();
        write!(
            f,
            "2. AFSK decoding: {} PASSED, {} FAILED ({:.1}%)",
            passed,
            failed,
            percent(passed, failed)
        )
    }
}

fn fields_match(packet: &AprsPacket, callsign: &str, ssid: u8, message: &[u8]) -> bool {
    packet.callsign() == callsign && packet.ssid() == ssid & 0x0F && packet.payload == message
}

/// Run the self test
pub fn run(args: &SelftestArgs) -> Result<SelftestReport> {
    let station = StationConfig {
        callsign: args.callsign.clone(),
        ssid: args.ssid,
        ..StationConfig::default()
    };
    let message = args.message.as_bytes();
    let sent = |packet: &AprsPacket| fields_match(packet, &args.callsign, args.ssid, message);
    let transmitter = Transmitter::new(station)?;

    let octets = transmitter.encode(message)?;
    let codec = decode_frame(&octets).is_ok_and(|packet| sent(&packet));
    info!("Codec round trip: {}", codec);

    let mut samples: PcmBuffer = transmitter.transmit(message)?;
    if let Some(path) = &args.output {
        write_wav_file(&samples, path)?;
        samples = read_wav_file(path)?;
    }

    let search = PhaseSearch::new();
    let shifts = (0..SAMPLES_PER_BIT)
        .map(|shift| {
            let result = search.run_at(samples.data(), shift);
            let recovered = result.as_deref() == Some(octets.as_slice());
            let decoded = recovered
                && result
                    .as_deref()
                    .and_then(|frame| decode_frame(frame).ok())
                    .is_some_and(|packet| sent(&packet));
            debug!(shift, recovered, decoded, "phase result");
            ShiftResult {
                shift,
                recovered,
                decoded,
            }
        })
        .collect();

    Ok(SelftestReport { codec, shifts })
}
