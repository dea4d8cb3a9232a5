//! Power and OSNR reduction over a spectrum snapshot
//!
//! Channel powers are summed in mW and converted to W before the dBm
//! conversion. NaN or negative inputs are not screened and propagate to
//! the result.

use optical_core::units::{lin2db, watt2dbm};
use optical_core::SpectralInformation;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SimulationConfig;

/// Total signal power (W)
pub fn total_power_w(si: &SpectralInformation) -> f64 {
    si.signal.iter().map(|p| p / 1000.0).sum()
}

/// Total signal power (dBm), equal to `10·log10(Σ mW)`
pub fn total_power_dbm(si: &SpectralInformation) -> f64 {
    watt2dbm(total_power_w(si))
}

/// Aggregate OSNR over all channels (dB).
///
/// A spectrum with exactly zero NLI + ASE reports the configured
/// transmitter OSNR.
pub fn osnr_db(si: &SpectralInformation, sim: &SimulationConfig) -> f64 {
    let signal_power_total = si.signal.iter().sum::<f64>() / 1000.0;
    let noise_power_total = si.noise().iter().sum::<f64>() / 1000.0;

    if noise_power_total == 0.0 {
        warn!(
            "No NLI/ASE noise in spectrum, using transmitter OSNR {:.2} dB",
            sim.tx_osnr_db
        );
        return sim.tx_osnr_db;
    }

    lin2db(signal_power_total / noise_power_total)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerReport {
    pub power_watts: f64,
    pub power_dbm: f64,
}

impl PowerReport {
    pub fn measure(si: &SpectralInformation) -> Self {
        let power_watts = total_power_w(si);
        Self {
            power_watts,
            power_dbm: watt2dbm(power_watts),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OsnrReport {
    pub osnr_db: f64,
}

impl OsnrReport {
    pub fn measure(si: &SpectralInformation, sim: &SimulationConfig) -> Self {
        Self {
            osnr_db: osnr_db(si, sim),
        }
    }

    /// Transmitter-defined OSNR, not computed from a spectrum
    pub fn transmitter(sim: &SimulationConfig) -> Self {
        Self {
            osnr_db: sim.tx_osnr_db,
        }
    }
}

/// OSNR at the four observation points, in line order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OsnrSummary {
    pub transmitter: OsnrReport,
    pub pre_fiber: OsnrReport,
    pub post_fiber: OsnrReport,
    pub receiver: OsnrReport,
}

impl OsnrSummary {
    pub fn values(&self) -> [f64; 4] {
        [
            self.transmitter.osnr_db,
            self.pre_fiber.osnr_db,
            self.post_fiber.osnr_db,
            self.receiver.osnr_db,
        ]
    }
}
