//! Transmitter comb construction

use optical_core::units::dbm2mw;
use optical_core::{
    automatic_nch, EngineError, Result, SpectralInformation, SpectralSourceFactory, SpectrumParams,
    MAX_CHANNELS,
};
use tracing::debug;

/// Build a uniform comb from transmitter settings.
///
/// Every channel carries `tx_power + delta_pdb` dBm, stored in mW. NLI and
/// ASE start at zero; the transmitter OSNR is carried per channel instead.
pub fn create_input_spectral_information(params: &SpectrumParams) -> Result<SpectralInformation> {
    if !(params.spacing > 0.0) {
        return Err(EngineError::invalid(
            "spacing",
            format!("must be > 0, got {}", params.spacing),
        ));
    }
    if !(params.f_max > params.f_min) {
        return Err(EngineError::invalid(
            "f_max",
            format!("must exceed f_min ({} <= {})", params.f_max, params.f_min),
        ));
    }
    if !(params.baud_rate > 0.0) {
        return Err(EngineError::invalid(
            "baud_rate",
            format!("must be > 0, got {}", params.baud_rate),
        ));
    }
    if !(0.0..=1.0).contains(&params.roll_off) {
        return Err(EngineError::invalid(
            "roll_off",
            format!("must be within [0, 1], got {}", params.roll_off),
        ));
    }

    let nb_channel = automatic_nch(params.f_min, params.f_max, params.spacing);
    if nb_channel == 0 {
        return Err(EngineError::EmptySpectrum {
            f_min: params.f_min,
            f_max: params.f_max,
        });
    }
    if nb_channel > MAX_CHANNELS {
        return Err(EngineError::invalid(
            "spacing",
            format!(
                "{} Hz grid yields {} channels, limit is {}",
                params.spacing, nb_channel, MAX_CHANNELS
            ),
        ));
    }

    let channel_power_mw = dbm2mw(params.tx_power + params.delta_pdb);
    debug!(
        "Input comb: {} channels, {:.4} mW per channel",
        nb_channel, channel_power_mw
    );

    Ok(SpectralInformation::uniform(params, nb_channel, channel_power_mw))
}

/// Factory adapter over [`create_input_spectral_information`]
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSpectrumSource;

impl SpectralSourceFactory for InputSpectrumSource {
    fn create(&self, params: &SpectrumParams) -> Result<SpectralInformation> {
        create_input_spectral_information(params)
    }
}
