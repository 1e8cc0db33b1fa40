//! AFSK modulator
//!
//! Octets become an HDLC bit stream (idle lead-in, opening flag, stuffed
//! frame bits, closing flags), the bit stream is NRZI coded onto the two
//! tones, and each tone is synthesized from the shared sine table with a
//! phase accumulator so the waveform stays continuous across bits.

use crate::config::{AfskConfig, Tone, FLAG, IDLE, SAMPLES_PER_BIT, SAMPLE_RATE};
use crate::{ModemError, Result};
use afsk_core::buffer::PcmBuffer;
use afsk_core::waveform::{WaveformTable, TABLE_SIZE};
use dasp::Sample;

/// Phase accumulator units per table entry
const PHASE_STEP: usize = SAMPLE_RATE as usize / TABLE_SIZE;

/// Consecutive ones after which a zero is stuffed
const STUFF_AFTER: u32 = 5;

/// AFSK modulator
#[derive(Debug, Clone)]
pub struct AfskModulator {
    config: AfskConfig,
    table: &'static WaveformTable,
}

impl AfskModulator {
    /// Create a new AFSK modulator
    pub fn new(config: AfskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            table: WaveformTable::sine(),
        })
    }

    /// Modulator configuration
    pub fn config(&self) -> &AfskConfig {
        &self.config
    }

    /// Synthesize one transmission carrying `octets`
    pub fn modulate(&self, octets: &[u8]) -> Result<PcmBuffer> {
        let bits = line_bits(octets, self.config.begin_markers, self.config.end_markers);

        let mut samples = Vec::with_capacity(bits.len() * SAMPLES_PER_BIT);
        let mut state = ToneState::new(Tone::Low);
        for bit in bits {
            state.emit_bit(bit, self.table, self.config.headroom, &mut samples);
        }

        tracing::debug!(
            octets = octets.len(),
            bits = state.total_bits,
            samples = samples.len(),
            "modulated frame"
        );
        PcmBuffer::from_data(samples, SAMPLE_RATE).map_err(|err| err.map(ModemError::from))
    }
}

/// Bits of `byte`, least significant first
fn lsb_first(byte: u8) -> impl Iterator<Item = bool> {
    (0..8).map(move |i| (byte >> i) & 1 == 1)
}

/// The HDLC bit stream of one transmission, before NRZI coding
///
/// Marker bytes go out verbatim. Frame bytes are stuffed: after five
/// consecutive ones a zero is inserted, with the run carried across byte
/// boundaries.
pub fn line_bits(octets: &[u8], begin_markers: usize, end_markers: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity((begin_markers + 1 + end_markers + octets.len()) * 9);

    for _ in 0..begin_markers {
        bits.extend(lsb_first(IDLE));
    }
    bits.extend(lsb_first(FLAG));

    let mut ones = 0;
    for &byte in octets {
        for bit in lsb_first(byte) {
            bits.push(bit);
            if !bit {
                ones = 0;
                continue;
            }
            ones += 1;
            if ones == STUFF_AFTER {
                bits.push(false);
                ones = 0;
            }
        }
    }

    for _ in 0..end_markers {
        bits.extend(lsb_first(FLAG));
    }
    bits
}

/// Synthesizer state for one transmission
#[derive(Debug, Clone)]
struct ToneState {
    tone: Tone,
    phase: usize,
    total_bits: usize,
}

impl ToneState {
    fn new(tone: Tone) -> Self {
        Self {
            tone,
            phase: 0,
            total_bits: 0,
        }
    }

    /// NRZI-code one bit and append its samples
    fn emit_bit(&mut self, bit: bool, table: &WaveformTable, headroom: f64, out: &mut Vec<u8>) {
        if !bit {
            self.tone = self.tone.toggled();
        }
        self.total_bits += 1;

        let step = self.tone.frequency() as usize;
        while out.len() < self.total_bits * SAMPLES_PER_BIT {
            let level = headroom * f64::from(i8::MAX) * table.at(self.phase / PHASE_STEP);
            out.push((level as i8).to_sample::<u8>());
            self.phase = (self.phase + step) % SAMPLE_RATE as usize;
        }
    }
}
