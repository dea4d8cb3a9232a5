//! Receiving transceiver
//!
//! Evaluates per-channel quality and hands the spectrum back untouched.

use optical_core::units::{db2lin, lin2db};
use optical_core::{ReceiverElement, Result, SpectralInformation, OSNR_REFERENCE_BANDWIDTH_HZ};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Quality figures for one channel.
///
/// OSNR values use the 0.1 nm reference bandwidth; `snr` is in the
/// signal bandwidth. Noise-free channels report `+inf`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChannelMetrics {
    pub frequency: f64,
    pub osnr_ase: f64,
    pub osnr_nli: f64,
    pub snr: f64,
    /// Total OSNR including the transmitter contribution
    pub osnr_with_tx: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Transceiver {
    uid: String,
    metrics: Vec<ChannelMetrics>,
}

impl Transceiver {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            metrics: Vec::new(),
        }
    }

    /// Metrics from the last received spectrum
    pub fn metrics(&self) -> &[ChannelMetrics] {
        &self.metrics
    }

    pub fn mean_osnr_with_tx(&self) -> Option<f64> {
        if self.metrics.is_empty() {
            return None;
        }
        let sum: f64 = self.metrics.iter().map(|m| m.osnr_with_tx).sum();
        Some(sum / self.metrics.len() as f64)
    }

    fn evaluate(si: &SpectralInformation) -> Vec<ChannelMetrics> {
        (0..si.num_channels())
            .map(|i| {
                let signal = si.signal[i];
                let bw_ratio_db = lin2db(si.baud_rate[i] / OSNR_REFERENCE_BANDWIDTH_HZ);

                let osnr_ase = lin2db(signal / si.ase[i]) + bw_ratio_db;
                let osnr_nli = lin2db(signal / si.nli[i]) + bw_ratio_db;
                let snr = lin2db(signal / (si.nli[i] + si.ase[i]));

                let line_osnr = db2lin(snr + bw_ratio_db);
                let tx_osnr = db2lin(si.tx_osnr[i]);
                let osnr_with_tx = lin2db(1.0 / (1.0 / line_osnr + 1.0 / tx_osnr));

                ChannelMetrics {
                    frequency: si.frequency[i],
                    osnr_ase,
                    osnr_nli,
                    snr,
                    osnr_with_tx,
                }
            })
            .collect()
    }
}

impl ReceiverElement for Transceiver {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn receive(&mut self, si: SpectralInformation) -> Result<SpectralInformation> {
        si.check_shape()?;
        self.metrics = Self::evaluate(&si);

        for m in &self.metrics {
            debug!(
                "{}: {:.4} THz OSNR(ASE) {:.2} dB, OSNR(NLI) {:.2} dB, SNR {:.2} dB",
                self.uid,
                m.frequency / 1e12,
                m.osnr_ase,
                m.osnr_nli,
                m.snr
            );
        }
        if let Some(mean) = self.mean_osnr_with_tx() {
            info!("{}: mean OSNR incl. transmitter {:.2} dB", self.uid, mean);
        }

        Ok(si)
    }
}
