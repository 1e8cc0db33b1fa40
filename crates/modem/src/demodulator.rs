//! AFSK demodulator state machine
//!
//! Consumes one baud of samples per step, turns the tone decision into an
//! NRZI-decoded bit and tracks HDLC framing. Two shift registers are kept:
//! `sync` sees every line bit and is only used to spot flags, while `byte`
//! is rebuilt with stuffed zeros removed.

use crate::config::{Tone, FLAG};
use crate::discriminator::{discriminate, dominant_tone, WINDOW};

/// Consecutive ones that can only occur in an abort sequence
const ABORT_RUN: u32 = 7;

/// Ones that precede a stuffed zero
const STUFF_RUN: u32 = 5;

/// Outcome of feeding one bit to the demodulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A frame delimiter completed; byte alignment restarts after it
    Flag,
    /// A stuffed zero was dropped
    Skip,
    /// A full data byte was assembled
    Byte(u8),
    /// Seven or more ones in a row; the current frame is invalid
    Abort,
}

/// Framing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemodState {
    /// Hunting for a flag
    #[default]
    Idle,
    /// Between a flag and the next flag or abort
    InFrame,
}

/// Bit-level AFSK demodulator
#[derive(Debug, Clone)]
pub struct AfskDemodulator {
    state: DemodState,
    last_tone: Tone,
    byte: u8,
    sync: u8,
    ones: u32,
    bit_index: usize,
    frame_start: usize,
}

impl Default for AfskDemodulator {
    fn default() -> Self {
        Self::new()
    }
}

impl AfskDemodulator {
    /// Create a demodulator hunting for a flag, expecting the low tone first
    pub fn new() -> Self {
        Self {
            state: DemodState::Idle,
            last_tone: Tone::Low,
            byte: 0,
            sync: 0,
            ones: 0,
            bit_index: 0,
            frame_start: 0,
        }
    }

    /// Current framing state
    pub fn state(&self) -> DemodState {
        self.state
    }

    /// Process one baud worth of samples
    ///
    /// Only the first [`WINDOW`] samples are examined.
    pub fn step(&mut self, window: &[u8]) -> Option<Event> {
        debug_assert!(window.len() >= WINDOW);
        self.push_tone(dominant_tone(discriminate(window)))
    }

    /// Process one tone decision; an unchanged tone decodes as a one
    pub fn push_tone(&mut self, tone: Tone) -> Option<Event> {
        let bit = tone == self.last_tone;
        self.last_tone = tone;
        self.push_bit(bit)
    }

    /// Process one NRZI-decoded bit
    pub fn push_bit(&mut self, bit: bool) -> Option<Event> {
        let bit = u8::from(bit);
        self.bit_index += 1;
        self.byte = (self.byte >> 1) | (bit << 7);
        self.sync = (self.sync >> 1) | (bit << 7);

        if self.sync == FLAG {
            self.byte = 0;
            self.ones = 0;
            self.state = DemodState::InFrame;
            self.frame_start = self.bit_index;
            return Some(Event::Flag);
        }

        if self.state == DemodState::Idle {
            return None;
        }

        if bit == 1 {
            self.ones += 1;
            if self.ones >= ABORT_RUN {
                self.state = DemodState::Idle;
                self.ones = 0;
                return Some(Event::Abort);
            }
        } else {
            if self.ones == STUFF_RUN {
                // undo the shift that took the stuffed zero in
                self.byte <<= 1;
                self.frame_start += 1;
                self.ones = 0;
                return Some(Event::Skip);
            }
            self.ones = 0;
        }

        if self.bit_index.wrapping_sub(self.frame_start) % 8 == 0 {
            let byte = self.byte;
            self.byte = 0;
            return Some(Event::Byte(byte));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_byte(demod: &mut AfskDemodulator, byte: u8) -> Vec<Event> {
        (0..8)
            .filter_map(|i| demod.push_bit((byte >> i) & 1 == 1))
            .collect()
    }

    fn in_frame() -> AfskDemodulator {
        let mut demod = AfskDemodulator::new();
        assert_eq!(push_byte(&mut demod, FLAG), vec![Event::Flag]);
        demod
    }

    #[test]
    fn test_idle_until_flag() {
        let mut demod = AfskDemodulator::new();
        assert!(push_byte(&mut demod, 0x00).is_empty());
        assert!(push_byte(&mut demod, 0x12).is_empty());
        assert_eq!(demod.state(), DemodState::Idle);
        assert_eq!(push_byte(&mut demod, FLAG), vec![Event::Flag]);
        assert_eq!(demod.state(), DemodState::InFrame);
    }

    #[test]
    fn test_byte_after_flag() {
        let mut demod = in_frame();
        assert_eq!(push_byte(&mut demod, 0x41), vec![Event::Byte(0x41)]);
        assert_eq!(push_byte(&mut demod, 0x00), vec![Event::Byte(0x00)]);
    }

    #[test]
    fn test_consecutive_flags() {
        let mut demod = in_frame();
        assert_eq!(push_byte(&mut demod, FLAG), vec![Event::Flag]);
        assert_eq!(push_byte(&mut demod, FLAG), vec![Event::Flag]);
    }

    #[test]
    fn test_stuffed_zero_is_skipped() {
        let mut demod = in_frame();
        let line = [true, true, true, true, true, false, true, true, true];
        let events: Vec<Event> = line.iter().filter_map(|&b| demod.push_bit(b)).collect();
        assert_eq!(events, vec![Event::Skip, Event::Byte(0xFF)]);
    }

    #[test]
    fn test_seven_ones_abort() {
        let mut demod = in_frame();
        let events: Vec<Event> = (0..7).filter_map(|_| demod.push_bit(true)).collect();
        assert_eq!(events, vec![Event::Abort]);
        assert_eq!(demod.state(), DemodState::Idle);
        assert!(push_byte(&mut demod, 0x55).is_empty());
    }

    #[test]
    fn test_nrzi_decoding() {
        let mut demod = in_frame();
        // low tone is the starting reference, so repeating it is a one
        assert_eq!(demod.push_tone(Tone::Low), None);
        assert_eq!(demod.byte, 0x80);
        demod.push_tone(Tone::High);
        assert_eq!(demod.byte, 0x40);
        demod.push_tone(Tone::High);
        assert_eq!(demod.byte, 0xA0);
    }

    #[test]
    fn test_step_uses_discriminator() {
        let mut demod = AfskDemodulator::new();
        assert_eq!(demod.step(&[128; WINDOW]), None);
        assert_eq!(demod.last_tone, Tone::Low);
        assert_eq!(demod.bit_index, 1);
    }
}
