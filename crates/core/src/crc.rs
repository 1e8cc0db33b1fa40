//! CRC-16-CCITT frame check sequence (AX.25 / HDLC flavour)
//!
//! Seed `0xFFFF`, reflected CCITT update, complemented result, transmitted
//! low byte first.

/// Initial register value
pub const CRC16_SEED: u16 = 0xFFFF;

/// Incremental CRC-16-CCITT hasher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    state: u16,
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc16 {
    /// Create a hasher seeded with [`CRC16_SEED`]
    pub fn new() -> Self {
        Self { state: CRC16_SEED }
    }

    /// Feed more bytes
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.state = update_byte(self.state, byte);
        }
    }

    /// Complemented check value
    pub fn finalize(self) -> u16 {
        !self.state
    }
}

fn update_byte(crc: u16, data: u8) -> u16 {
    let mut data = data ^ (crc & 0xFF) as u8;
    data ^= data << 4;

    ((u16::from(data) << 8) | (crc >> 8)) ^ u16::from(data >> 4) ^ (u16::from(data) << 3)
}

/// CRC-16-CCITT of `data`
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.finalize()
}

/// Append the check sequence of `frame` to it, low byte first
pub fn append_fcs(frame: &mut Vec<u8>) {
    let fcs = crc16_ccitt(frame);
    frame.extend_from_slice(&fcs.to_le_bytes());
}

/// Split a frame into its body and the transmitted check sequence
///
/// Returns `None` when the frame is too short to hold a check sequence.
pub fn split_fcs(frame: &[u8]) -> Option<(&[u8], u16)> {
    let body_len = frame.len().checked_sub(2)?;
    let (body, fcs) = frame.split_at(body_len);
    Some((body, u16::from_le_bytes([fcs[0], fcs[1]])))
}

/// Whether the trailing two bytes of `frame` match the CRC of the rest
pub fn fcs_matches(frame: &[u8]) -> bool {
    split_fcs(frame).is_some_and(|(body, fcs)| crc16_ccitt(body) == fcs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_reference_vector() {
        assert_eq!(crc16_ccitt(b"123456789"), 0x906E);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(crc16_ccitt(&[]), 0x0000);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut crc = Crc16::new();
        crc.update(b"1234");
        crc.update(b"56789");
        assert_eq!(crc.finalize(), 0x906E);
    }

    #[test]
    fn test_append_is_low_byte_first() {
        let mut frame = b"123456789".to_vec();
        append_fcs(&mut frame);
        assert_eq!(&frame[9..], &[0x6E, 0x90]);
        assert!(fcs_matches(&frame));
    }

    #[test]
    fn test_split_short_frame() {
        assert!(split_fcs(&[0x01]).is_none());
        assert_eq!(split_fcs(&[0x34, 0x12]), Some((&[][..], 0x1234)));
        assert!(!fcs_matches(&[]));
    }

    #[quickcheck]
    fn prop_single_bit_flip_detected(data: Vec<u8>, position: usize, bit: u8) -> bool {
        let mut frame = data;
        append_fcs(&mut frame);
        let index = position % frame.len();
        frame[index] ^= 1 << (bit % 8);
        !fcs_matches(&frame)
    }
}
