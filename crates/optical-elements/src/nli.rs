//! Gaussian-noise model NLI
//!
//! Closed-form incoherent GN model for a single span:
//!
//! ```text
//! G_NLI(i) = (16/27)·(γ·L_eff)² / (2π·|β₂|·L_a) · Σ_j G_j²·G_i·ψ(i, j)
//! P_NLI(i) = B_i · G_NLI(i)
//! ```
//!
//! with `G = P/B` the channel power spectral density and `ψ` the SCI
//! (j = i) or XCI (j ≠ i) asinh kernel.

use std::f64::consts::PI;

use optical_core::{EngineError, Result, SpectralInformation};

/// Span coefficients consumed by the GN closed form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GnModel {
    /// Nonlinear coefficient (1/(W·m))
    pub gamma: f64,
    /// Group velocity dispersion (s²/m)
    pub beta2: f64,
    /// Effective length (m)
    pub effective_length: f64,
    /// Asymptotic effective length (m)
    pub asymptotic_length: f64,
}

impl GnModel {
    fn psi(&self, df: f64, cut_baud_rate: f64, pump_baud_rate: f64) -> f64 {
        let k = PI.powi(2) * self.asymptotic_length * self.beta2.abs();
        if df == 0.0 {
            (0.5 * k * cut_baud_rate.powi(2)).asinh()
        } else {
            (k * cut_baud_rate * (df + 0.5 * pump_baud_rate)).asinh()
                - (k * cut_baud_rate * (df - 0.5 * pump_baud_rate)).asinh()
        }
    }

    /// NLI power generated in each channel, referred to the span input (mW)
    pub fn nli_per_channel(&self, si: &SpectralInformation) -> Result<Vec<f64>> {
        if !(self.beta2.abs() > 0.0) || !(self.asymptotic_length > 0.0) {
            return Err(EngineError::Numerical {
                element: "GN model".to_string(),
                reason: format!(
                    "needs non-zero dispersion and loss (beta2={}, L_a={})",
                    self.beta2, self.asymptotic_length
                ),
            });
        }

        let prefactor = (16.0 / 27.0) * (self.gamma * self.effective_length).powi(2)
            / (2.0 * PI * self.beta2.abs() * self.asymptotic_length);

        let psd: Vec<f64> = si
            .signal
            .iter()
            .zip(&si.baud_rate)
            .map(|(p_mw, b)| p_mw / 1000.0 / b)
            .collect();

        let nli = (0..si.num_channels())
            .map(|cut| {
                let g_nli: f64 = (0..si.num_channels())
                    .map(|pump| {
                        let df = si.frequency[pump] - si.frequency[cut];
                        psd[pump].powi(2)
                            * psd[cut]
                            * self.psi(df, si.baud_rate[cut], si.baud_rate[pump])
                    })
                    .sum();
                si.baud_rate[cut] * g_nli * prefactor * 1000.0
            })
            .collect::<Vec<f64>>();

        if let Some(bad) = nli.iter().position(|p| !p.is_finite()) {
            return Err(EngineError::Numerical {
                element: "GN model".to_string(),
                reason: format!("non-finite NLI on channel {}", bad),
            });
        }

        Ok(nli)
    }
}
