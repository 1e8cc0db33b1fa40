//! AX.25 address fields
//!
//! Each field is seven octets: six callsign characters, space padded, then
//! an SSID octet. Every octet is shifted left by one on the wire and the low
//! bit of the final SSID octet marks the end of the address list.

use crate::{FrameError, Result};
use afsk_core::Traced;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Octets per address field
pub const ADDRESS_LEN: usize = 7;

/// Maximum callsign characters
pub const CALLSIGN_LEN: usize = 6;

/// Highest SSID value
pub const MAX_SSID: u8 = 0x0F;

/// End-of-address bit, after the shift
const EXTENSION_BIT: u8 = 0x01;

/// A station callsign with its secondary station identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAddress")]
pub struct Address {
    callsign: String,
    ssid: u8,
}

/// Serialized form, checked by `Address::try_from` before use
#[derive(Deserialize)]
struct RawAddress {
    callsign: String,
    ssid: u8,
}

impl TryFrom<RawAddress> for Address {
    type Error = Traced<FrameError>;

    fn try_from(raw: RawAddress) -> Result<Self> {
        if raw.ssid > MAX_SSID {
            return Err(Traced::new(FrameError::format(format!(
                "SSID out of range: {} (max {})",
                raw.ssid, MAX_SSID
            ))));
        }
        Self::new(&raw.callsign, raw.ssid)
    }
}

impl Address {
    /// Validate a callsign and mask the SSID to four bits
    pub fn new(callsign: &str, ssid: u8) -> Result<Self> {
        if callsign.len() > CALLSIGN_LEN {
            return Err(Traced::new(FrameError::format(format!(
                "Callsign longer than {} characters: {:?}",
                CALLSIGN_LEN, callsign
            ))));
        }
        if !callsign.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Traced::new(FrameError::format(format!(
                "Callsign must be ASCII letters and digits: {:?}",
                callsign
            ))));
        }

        Ok(Self {
            callsign: callsign.to_string(),
            ssid: ssid & MAX_SSID,
        })
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    pub fn ssid(&self) -> u8 {
        self.ssid
    }

    /// Append the shifted field; `ssid_bits` supplies the reserved and command bits
    pub(crate) fn write(&self, ssid_bits: u8, out: &mut Vec<u8>) {
        let padded = self
            .callsign
            .bytes()
            .chain(std::iter::repeat(b' '))
            .take(CALLSIGN_LEN);
        out.extend(padded.map(|c| c << 1));
        out.push((ssid_bits | self.ssid) << 1);
    }

    /// Parse one shifted field, returning the address and whether it ends the list
    ///
    /// Callsigns are not re-validated, so foreign stations with unusual
    /// characters still decode.
    pub(crate) fn read(field: &[u8]) -> Result<(Self, bool)> {
        if field.len() < ADDRESS_LEN {
            return Err(Traced::new(FrameError::format(format!(
                "Address field truncated: {} of {} bytes",
                field.len(),
                ADDRESS_LEN
            ))));
        }

        let callsign: String = field[..CALLSIGN_LEN]
            .iter()
            .map(|&b| char::from(b >> 1))
            .collect();
        let ssid_octet = field[CALLSIGN_LEN];

        let address = Self {
            callsign: callsign.trim_end_matches(' ').to_string(),
            ssid: (ssid_octet >> 1) & MAX_SSID,
        };
        Ok((address, ssid_octet & EXTENSION_BIT != 0))
    }
}

/// Mark the last written field as the end of the address list
pub(crate) fn terminate(out: &mut [u8]) {
    if let Some(last) = out.last_mut() {
        *last |= EXTENSION_BIT;
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid == 0 {
            write!(f, "{}", self.callsign)
        } else {
            write!(f, "{}-{}", self.callsign, self.ssid)
        }
    }
}

impl FromStr for Address {
    type Err = Traced<FrameError>;

    /// Parse `CALL` or `CALL-SSID`
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('-') {
            None => Self::new(s, 0),
            Some((callsign, ssid)) => match ssid.parse::<u8>() {
                Ok(ssid) if ssid <= MAX_SSID => Self::new(callsign, ssid),
                _ => {
                    let msg = format!("Invalid SSID in {:?}", s);
                    Err(Traced::new(FrameError::format(msg)))
                }
            },
        }
    }
}
