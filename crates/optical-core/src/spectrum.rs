//! Spectral information
//!
//! Struct-of-arrays view of a WDM comb: one entry per channel in every
//! vector. Powers are held in milliwatts.

use serde::{Deserialize, Serialize};

use crate::units::db2lin;
use crate::{EngineError, Result};

/// Parameters for building an input comb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumParams {
    /// Lower band edge (Hz)
    pub f_min: f64,
    /// Upper band edge (Hz)
    pub f_max: f64,
    /// Pulse-shaping roll-off (0-1)
    pub roll_off: f64,
    /// Symbol rate (Bd)
    pub baud_rate: f64,
    /// Channel spacing (Hz)
    pub spacing: f64,
    /// Transmitter OSNR (dB)
    pub tx_osnr: f64,
    /// Per-channel launch power (dBm)
    pub tx_power: f64,
    /// Power offset applied to every channel (dB)
    pub delta_pdb: f64,
    /// Slot width (Hz)
    pub slot_width: f64,
}

/// Number of channels that fit in `[f_min, f_max]` at `spacing`
pub fn automatic_nch(f_min: f64, f_max: f64, spacing: f64) -> usize {
    let n = ((f_max - f_min) / spacing).floor();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralInformation {
    /// Channel center frequency (Hz)
    pub frequency: Vec<f64>,
    /// Symbol rate (Bd)
    pub baud_rate: Vec<f64>,
    /// Slot width (Hz)
    pub slot_width: Vec<f64>,
    /// Roll-off
    pub roll_off: Vec<f64>,
    /// Signal power (mW)
    pub signal: Vec<f64>,
    /// Nonlinear interference power (mW)
    pub nli: Vec<f64>,
    /// Amplified spontaneous emission power (mW)
    pub ase: Vec<f64>,
    /// Transmitter OSNR (dB)
    pub tx_osnr: Vec<f64>,
    /// Accumulated chromatic dispersion (s/m)
    pub chromatic_dispersion: Vec<f64>,
    /// Accumulated differential group delay (s)
    pub pmd: Vec<f64>,
    /// Accumulated propagation delay (s)
    pub latency: Vec<f64>,
}

impl SpectralInformation {
    /// Uniform comb, channel `i` (1-based) at `f_min + i * spacing`
    pub fn uniform(params: &SpectrumParams, num_channels: usize, channel_power_mw: f64) -> Self {
        let frequency: Vec<f64> = (1..=num_channels)
            .map(|i| params.f_min + params.spacing * i as f64)
            .collect();

        SpectralInformation {
            frequency,
            baud_rate: vec![params.baud_rate; num_channels],
            slot_width: vec![params.slot_width; num_channels],
            roll_off: vec![params.roll_off; num_channels],
            signal: vec![channel_power_mw; num_channels],
            nli: vec![0.0; num_channels],
            ase: vec![0.0; num_channels],
            tx_osnr: vec![params.tx_osnr; num_channels],
            chromatic_dispersion: vec![0.0; num_channels],
            pmd: vec![0.0; num_channels],
            latency: vec![0.0; num_channels],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Check every per-channel array against the frequency grid
    pub fn check_shape(&self) -> Result<()> {
        let expected = self.num_channels();
        let fields: [(&'static str, usize); 10] = [
            ("baud_rate", self.baud_rate.len()),
            ("slot_width", self.slot_width.len()),
            ("roll_off", self.roll_off.len()),
            ("signal", self.signal.len()),
            ("nli", self.nli.len()),
            ("ase", self.ase.len()),
            ("tx_osnr", self.tx_osnr.len()),
            ("chromatic_dispersion", self.chromatic_dispersion.len()),
            ("pmd", self.pmd.len()),
            ("latency", self.latency.len()),
        ];

        for (field, actual) in fields {
            if actual != expected {
                return Err(EngineError::ShapeMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Per-channel noise power, NLI + ASE (mW)
    pub fn noise(&self) -> Vec<f64> {
        self.nli.iter().zip(&self.ase).map(|(n, a)| n + a).collect()
    }

    /// Scale signal, NLI and ASE by a loss in dB
    pub fn apply_attenuation_db(&mut self, loss_db: f64) {
        self.apply_gain_lin(1.0 / db2lin(loss_db));
    }

    pub fn apply_gain_lin(&mut self, factor: f64) {
        for p in self
            .signal
            .iter_mut()
            .chain(self.nli.iter_mut())
            .chain(self.ase.iter_mut())
        {
            *p *= factor;
        }
    }
}
