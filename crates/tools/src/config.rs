//! Station configuration for the AFSK tools

use afsk_frame::address::Address;
use afsk_modem::config::AfskConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to key up a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub callsign: String,
    pub ssid: u8,
    /// Digipeaters as `CALL` or `CALL-SSID`
    pub path: Vec<String>,
    pub modem: AfskConfig,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            callsign: "NOCALL".to_string(),
            ssid: 0,
            path: Vec::new(),
            modem: AfskConfig::bell_202(),
        }
    }
}

impl StationConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        config.modem.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// The sending station
    pub fn source(&self) -> Result<Address> {
        Ok(Address::new(&self.callsign, self.ssid)?)
    }

    /// Parsed digipeater path
    pub fn digipeaters(&self) -> Result<Vec<Address>> {
        self.path
            .iter()
            .map(|hop| {
                hop.parse::<Address>()
                    .with_context(|| format!("Invalid digipeater {:?}", hop))
            })
            .collect()
    }
}
