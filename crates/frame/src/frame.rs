//! AX.25 UI frames carrying APRS payloads

use crate::address::{self, Address, ADDRESS_LEN};
use crate::{FrameError, Result};
use afsk_core::crc::{append_fcs, crc16_ccitt, split_fcs};
use afsk_core::{TraceResultExt, Traced};
use serde::{Deserialize, Serialize};

/// Experimental-software destination used for every transmitted frame
pub const DESTINATION: &str = "APZQ01";

/// SSID carried by the destination field
pub const DESTINATION_SSID: u8 = 1;

/// Unnumbered information frame
pub const CONTROL_UI: u8 = 0x03;

/// No layer 3 protocol
pub const PID_NO_LAYER3: u8 = 0xF0;

/// Repeater addresses allowed between source and control
pub const MAX_DIGIPEATERS: usize = 8;

/// Destination, source, control, protocol ID and check sequence
pub const MIN_FRAME_LEN: usize = 2 * ADDRESS_LEN + 2 + 2;

const UNTERMINATED: &str = "Address list not terminated before end of frame";

/// SSID octet bits above the SSID: command bit set, reserved bits set
const DESTINATION_SSID_BITS: u8 = 0b0111_0000;

/// Reserved bits set, command bit clear
const SOURCE_SSID_BITS: u8 = 0b0011_0000;

/// Reserved bits set, has-been-repeated bit clear
const REPEATER_SSID_BITS: u8 = 0b0011_0000;

fn check_path_len(len: usize) -> Result<()> {
    if len > MAX_DIGIPEATERS {
        return Err(Traced::new(FrameError::format(format!(
            "Too many digipeaters: {} (max {})",
            len, MAX_DIGIPEATERS
        ))));
    }
    Ok(())
}

/// A decoded or to-be-encoded APRS packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AprsPacket {
    /// Sending station
    pub source: Address,
    /// Digipeaters, in transmission order
    pub path: Vec<Address>,
    pub control: u8,
    pub protocol_id: u8,
    /// Information field
    pub payload: Vec<u8>,
}

impl AprsPacket {
    /// Sender callsign without padding
    pub fn callsign(&self) -> &str {
        self.source.callsign()
    }

    /// Sender SSID
    pub fn ssid(&self) -> u8 {
        self.source.ssid()
    }

    /// Serialize to frame octets, check sequence included
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        check_path_len(self.path.len())?;

        let capacity = MIN_FRAME_LEN + self.path.len() * ADDRESS_LEN + self.payload.len();
        let mut bytes = Vec::with_capacity(capacity);
        Address::new(DESTINATION, DESTINATION_SSID)?.write(DESTINATION_SSID_BITS, &mut bytes);
        self.source.write(SOURCE_SSID_BITS, &mut bytes);
        for repeater in &self.path {
            repeater.write(REPEATER_SSID_BITS, &mut bytes);
        }
        address::terminate(&mut bytes);

        bytes.push(self.control);
        bytes.push(self.protocol_id);
        bytes.extend_from_slice(&self.payload);
        append_fcs(&mut bytes);
        Ok(bytes)
    }

    /// Parse frame octets, verifying the check sequence
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_FRAME_LEN {
            return Err(Traced::new(FrameError::format(format!(
                "Frame too short: {} bytes (min {})",
                bytes.len(),
                MIN_FRAME_LEN
            ))));
        }

        let (body, received) = split_fcs(bytes)
            .ok_or_else(|| Traced::new(FrameError::format("Frame too short for checksum")))?;
        let computed = crc16_ccitt(body);
        if computed != received {
            return Err(Traced::new(FrameError::InvalidChecksum {
                expected: computed,
                actual: received,
            }));
        }

        let (destination, last) = Address::read(body)?;
        if last {
            return Err(Traced::new(FrameError::format(
                "Address list ends at the destination",
            )));
        }

        let (source, mut last) = Address::read(&body[ADDRESS_LEN..])?;
        let mut offset = 2 * ADDRESS_LEN;
        let mut path = Vec::new();
        while !last {
            if path.len() == MAX_DIGIPEATERS {
                let msg = format!("Address list exceeds {MAX_DIGIPEATERS} digipeaters");
                return Err(Traced::new(FrameError::format(msg)));
            }
            let field = body.get(offset..).unwrap_or_default();
            let (repeater, end) = Address::read(field).context(UNTERMINATED)?;
            path.push(repeater);
            last = end;
            offset += ADDRESS_LEN;
        }

        let header = body.get(offset..offset + 2).ok_or_else(|| {
            Traced::new(FrameError::format("Frame truncated before control field"))
        })?;

        tracing::trace!(
            destination = %destination,
            source = %source,
            digipeaters = path.len(),
            payload = body.len() - offset - 2,
            "decoded frame"
        );

        Ok(Self {
            source,
            path,
            control: header[0],
            protocol_id: header[1],
            payload: body[offset + 2..].to_vec(),
        })
    }
}

/// Builder for APRS packets
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    callsign: String,
    ssid: u8,
    path: Vec<(String, u8)>,
    control: u8,
    protocol_id: u8,
}

impl FrameBuilder {
    /// Start a UI frame from `callsign`-`ssid`
    pub fn new(callsign: &str, ssid: u8) -> Self {
        Self {
            callsign: callsign.to_string(),
            ssid,
            path: Vec::new(),
            control: CONTROL_UI,
            protocol_id: PID_NO_LAYER3,
        }
    }

    /// Append a digipeater to the path
    pub fn digipeater(mut self, callsign: &str, ssid: u8) -> Self {
        self.path.push((callsign.to_string(), ssid));
        self
    }

    /// Override the control field
    pub fn control(mut self, control: u8) -> Self {
        self.control = control;
        self
    }

    /// Override the protocol identifier
    pub fn protocol_id(mut self, protocol_id: u8) -> Self {
        self.protocol_id = protocol_id;
        self
    }

    /// Validate the addresses and attach `payload`
    pub fn build(self, payload: &[u8]) -> Result<AprsPacket> {
        let source = Address::new(&self.callsign, self.ssid)?;
        check_path_len(self.path.len())?;
        let path = self
            .path
            .iter()
            .map(|(callsign, ssid)| Address::new(callsign, *ssid))
            .collect::<Result<Vec<_>>>()?;

        Ok(AprsPacket {
            source,
            path,
            control: self.control,
            protocol_id: self.protocol_id,
            payload: payload.to_vec(),
        })
    }
}

/// Encode a UI frame from `callsign`-`ssid` with no digipeaters
pub fn encode_frame(callsign: &str, ssid: u8, payload: &[u8]) -> Result<Vec<u8>> {
    FrameBuilder::new(callsign, ssid).build(payload)?.to_bytes()
}

/// Decode frame octets recovered by the demodulator
pub fn decode_frame(octets: &[u8]) -> Result<AprsPacket> {
    AprsPacket::from_bytes(octets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    const PIRATE_FRAME: [u8; 24] = [
        0x82, 0xa0, 0xb4, 0xa2, 0x60, 0x62, 0xe2, 0xa0, 0x92, 0xa4, 0x82, 0xa8, 0x8a, 0x63, 0x03,
        0xf0, 0x3e, 0x48, 0x45, 0x4c, 0x4c, 0x4f, 0x68, 0xa9,
    ];

    #[derive(Debug, Clone)]
    struct Callsign(String);

    impl Arbitrary for Callsign {
        fn arbitrary(g: &mut Gen) -> Self {
            let alphabet: Vec<char> = ('A'..='Z').chain('0'..='9').collect();
            let len = usize::arbitrary(g) % 7;
            Callsign((0..len).map(|_| *g.choose(&alphabet).unwrap()).collect())
        }
    }

    #[test]
    fn test_known_frame() {
        let bytes = encode_frame("PIRATE", 1, b">HELLO").unwrap();
        assert_eq!(bytes, PIRATE_FRAME);

        let packet = decode_frame(&PIRATE_FRAME).unwrap();
        assert_eq!(packet.callsign(), "PIRATE");
        assert_eq!(packet.ssid(), 1);
        assert_eq!(packet.payload, b">HELLO");
        assert_eq!(packet.control, CONTROL_UI);
        assert_eq!(packet.protocol_id, PID_NO_LAYER3);
        assert!(packet.path.is_empty());
    }

    #[quickcheck]
    fn prop_round_trip(callsign: Callsign, ssid: u8, payload: Vec<u8>) -> bool {
        let bytes = encode_frame(&callsign.0, ssid, &payload).unwrap();
        let packet = decode_frame(&bytes).unwrap();
        packet.callsign() == callsign.0 && packet.ssid() == ssid & 0x0F && packet.payload == payload
    }

    #[test]
    fn test_short_callsign_padded() {
        let bytes = encode_frame("K1", 0, b"").unwrap();
        assert_eq!(bytes.len(), MIN_FRAME_LEN);
        assert_eq!(&bytes[7..13], &[0x96, 0x62, 0x40, 0x40, 0x40, 0x40]);
        assert_eq!(bytes[13], 0x61);
        assert_eq!(decode_frame(&bytes).unwrap().callsign(), "K1");
    }

    #[test]
    fn test_rejects_bad_callsign() {
        for callsign in ["PIRATES", "pi rat", "N0CALL!"] {
            let err = encode_frame(callsign, 0, b"x").unwrap_err();
            assert!(matches!(err.kind(), FrameError::InvalidFormat { .. }));
        }
    }

    #[test]
    fn test_digipeater_path() {
        let packet = FrameBuilder::new("N0CALL", 7)
            .digipeater("WIDE1", 1)
            .digipeater("WIDE2", 2)
            .build(b"!4903.50N/07201.75W-")
            .unwrap();
        let bytes = packet.to_bytes().unwrap();
        assert_eq!(bytes.len(), MIN_FRAME_LEN + 2 * ADDRESS_LEN + 20);

        // only the final address octet carries the end bit
        let address_octets = 4 * ADDRESS_LEN;
        let ends: Vec<usize> = (0..address_octets).filter(|&i| bytes[i] & 1 == 1).collect();
        assert_eq!(ends, vec![address_octets - 1]);

        let decoded = decode_frame(&bytes).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.path[1].to_string(), "WIDE2-2");
    }

    #[test]
    fn test_too_many_digipeaters() {
        let builder = (0..=MAX_DIGIPEATERS).fold(FrameBuilder::new("N0CALL", 0), |b, n| {
            b.digipeater("RELAY", n as u8)
        });
        assert!(builder.build(b"").is_err());

        let mut packet = FrameBuilder::new("N0CALL", 0).build(b"").unwrap();
        packet.path = vec![Address::new("RELAY", 0).unwrap(); MAX_DIGIPEATERS + 1];
        let err = packet.to_bytes().unwrap_err();
        assert!(matches!(err.kind(), FrameError::InvalidFormat { .. }));
    }

    #[test]
    fn test_custom_control_passes_through() {
        let packet = FrameBuilder::new("N0CALL", 0)
            .control(0x13)
            .protocol_id(0xCF)
            .build(b"netrom")
            .unwrap();
        let decoded = decode_frame(&packet.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.control, 0x13);
        assert_eq!(decoded.protocol_id, 0xCF);
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut bytes = PIRATE_FRAME;
        bytes[16] ^= 0x20;
        let err = decode_frame(&bytes).unwrap_err();
        match err.kind() {
            FrameError::InvalidChecksum { expected, actual } => {
                assert_eq!(*actual, 0xa968);
                assert_ne!(expected, actual);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_truncated_frames() {
        for len in 0..MIN_FRAME_LEN {
            let err = decode_frame(&PIRATE_FRAME[..len]).unwrap_err();
            assert!(matches!(err.kind(), FrameError::InvalidFormat { .. }));
        }
    }

    /// Body octets with a freshly computed check sequence
    fn with_fcs(body: &[u8]) -> Vec<u8> {
        let mut bytes = body.to_vec();
        append_fcs(&mut bytes);
        bytes
    }

    #[test]
    fn test_destination_terminated() {
        let mut body = PIRATE_FRAME[..PIRATE_FRAME.len() - 2].to_vec();
        body[6] |= 1;
        let err = decode_frame(&with_fcs(&body)).unwrap_err();
        assert!(matches!(err.kind(), FrameError::InvalidFormat { .. }));
    }

    #[test]
    fn test_missing_terminator() {
        let mut body = PIRATE_FRAME[..PIRATE_FRAME.len() - 2].to_vec();
        body[13] &= !1;
        let err = decode_frame(&with_fcs(&body)).unwrap_err();
        assert!(matches!(err.kind(), FrameError::InvalidFormat { .. }));
        assert_eq!(err.trace().len(), 1);
    }

    #[test]
    fn test_serde_json() {
        let packet = decode_frame(&PIRATE_FRAME).unwrap();
        let json = serde_json::to_string(&packet).unwrap();
        assert!(json.contains("\"callsign\":\"PIRATE\""));
        let restored: AprsPacket = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, packet);
    }

    #[test]
    fn test_deserialized_packet_cannot_bypass_validation() {
        let json = r#"{
            "source": {"callsign": "TOOLONGCALL", "ssid": 200},
            "path": [],
            "control": 3,
            "protocol_id": 240,
            "payload": [62, 72, 73]
        }"#;
        assert!(serde_json::from_str::<AprsPacket>(json).is_err());

        let json = json.replace("TOOLONGCALL", "PIRATE").replace("200", "1");
        let packet: AprsPacket = serde_json::from_str(&json).unwrap();
        let bytes = packet.to_bytes().unwrap();
        assert_eq!(&bytes[7..14], &PIRATE_FRAME[7..14]);
    }
}
