//! Optical Core Library
//!
//! Shared model for single-span WDM simulation:
//! - Power unit conversions (dB, dBm, W, mW)
//! - Per-channel spectral information (signal, NLI and ASE power)
//! - Capability traits implemented by propagation engines

use thiserror::Error;

pub mod element;
pub mod spectrum;
pub mod units;

pub use element::{ReceiverElement, SpectralSourceFactory, TransmissionElement};
pub use spectrum::{automatic_nch, SpectralInformation, SpectrumParams};

/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Planck constant (J·s)
pub const PLANCK: f64 = 6.626_070_15e-34;

/// Reference frequency for dispersion and nonlinear coefficients (Hz)
pub const REFERENCE_FREQUENCY_HZ: f64 = 193.5e12;

/// OSNR reference noise bandwidth, 0.1 nm at 1550 nm (Hz)
pub const OSNR_REFERENCE_BANDWIDTH_HZ: f64 = 12.5e9;

/// Largest comb a source will build; every per-channel array is allocated
/// at this length, and the NLI kernel is quadratic in it.
pub const MAX_CHANNELS: usize = 4096;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Spectrum has no channels between {f_min} Hz and {f_max} Hz")]
    EmptySpectrum { f_min: f64, f_max: f64 },
    #[error("Channel array length mismatch: {field} has {actual}, expected {expected}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Numerical failure in {element}: {reason}")]
    Numerical { element: String, reason: String },
}

impl EngineError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
