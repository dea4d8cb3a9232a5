//! Simulation and fiber configuration
//!
//! Defaults reproduce the reference C-band scenario. A JSON file may
//! override any subset of fields:
//!
//! ```json
//! { "simulation": { "tx_power_dbm": 3.0 }, "fiber": { "length": 60.0 } }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use optical_core::{automatic_nch, SpectrumParams};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ConfigError;

pub use optical_elements::{FiberConfig, LengthUnits};

/// Minimum frequency (Hz)
pub const F_MIN_HZ: f64 = 191.4e12;
/// Maximum frequency (Hz)
pub const F_MAX_HZ: f64 = 195.1e12;
/// Channel spacing (Hz)
pub const SPACING_HZ: f64 = 50e9;
pub const ROLL_OFF: f64 = 0.15;
/// Transmitter OSNR (dB)
pub const TX_OSNR_DB: f64 = 40.0;
/// Per-channel transmitter power (dBm)
pub const TX_POWER_DBM: f64 = 6.0;
/// Symbol rate (Bd)
pub const BAUD_RATE: f64 = 32e9;

/// Transmitter and grid settings, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub channel_spacing: f64,
    pub roll_off: f64,
    pub tx_osnr_db: f64,
    pub tx_power_dbm: f64,
    pub baud_rate: f64,
    pub power_delta_db: f64,
    pub slot_width: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_frequency: F_MIN_HZ,
            max_frequency: F_MAX_HZ,
            channel_spacing: SPACING_HZ,
            roll_off: ROLL_OFF,
            tx_osnr_db: TX_OSNR_DB,
            tx_power_dbm: TX_POWER_DBM,
            baud_rate: BAUD_RATE,
            power_delta_db: 0.0,
            slot_width: SPACING_HZ,
        }
    }
}

impl SimulationConfig {
    pub fn num_channels(&self) -> usize {
        automatic_nch(self.min_frequency, self.max_frequency, self.channel_spacing)
    }

    pub fn spectrum_params(&self) -> SpectrumParams {
        SpectrumParams {
            f_min: self.min_frequency,
            f_max: self.max_frequency,
            roll_off: self.roll_off,
            baud_rate: self.baud_rate,
            spacing: self.channel_spacing,
            tx_osnr: self.tx_osnr_db,
            tx_power: self.tx_power_dbm,
            delta_pdb: self.power_delta_db,
            slot_width: self.slot_width,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanConfig {
    pub simulation: SimulationConfig,
    pub fiber: FiberConfig,
}

impl SpanConfig {
    pub fn with_length(length_km: f64) -> Self {
        Self {
            simulation: SimulationConfig::default(),
            fiber: FiberConfig::with_length(length_km),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading span configuration from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
