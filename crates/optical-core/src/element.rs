//! Capability traits for propagation engines
//!
//! Report and pipeline code only talks to these; tests substitute
//! deterministic stubs.

use crate::spectrum::{SpectralInformation, SpectrumParams};
use crate::Result;

/// Builds the transmitted comb
pub trait SpectralSourceFactory {
    fn create(&self, params: &SpectrumParams) -> Result<SpectralInformation>;
}

/// Line element that transforms the spectrum (fiber span)
pub trait TransmissionElement {
    fn uid(&self) -> &str;

    /// Reference per-channel input power used for design bookkeeping (dBm)
    fn set_ref_pch_in_dbm(&mut self, power_dbm: f64);

    fn propagate(&mut self, spectral_info: SpectralInformation) -> Result<SpectralInformation>;
}

/// Terminal element at the end of the line
pub trait ReceiverElement {
    fn uid(&self) -> &str;

    fn receive(&mut self, spectral_info: SpectralInformation) -> Result<SpectralInformation>;
}
