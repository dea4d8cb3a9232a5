//! Fiber span element
//!
//! Order of operations on the comb:
//! 1. input attenuation + input connector loss
//! 2. NLI generation at the span input (GN model)
//! 3. span loss + output connector loss applied to signal, NLI and ASE
//! 4. chromatic dispersion, PMD and latency accumulation

use std::f64::consts::{E, PI};

use optical_core::units::lin2db;
use optical_core::{
    EngineError, Result, SpectralInformation, TransmissionElement, REFERENCE_FREQUENCY_HZ,
    SPEED_OF_LIGHT,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::nli::GnModel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnits {
    #[default]
    Km,
    M,
}

impl LengthUnits {
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            LengthUnits::Km => 1000.0,
            LengthUnits::M => 1.0,
        }
    }
}

/// Physical description of a span
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FiberConfig {
    /// Span length, in `length_units`
    #[serde(alias = "length_km")]
    pub length: f64,
    /// Attenuation (dB/km)
    pub loss_coef_db_per_km: f64,
    pub length_units: LengthUnits,
    /// Extra attenuation at the span input (dB)
    pub input_attenuation_db: f64,
    pub input_connector_loss_db: f64,
    pub output_connector_loss_db: f64,
    /// PMD coefficient (ps/√km)
    pub pmd_coefficient: f64,
    /// Chromatic dispersion (ps/(nm·km))
    pub chromatic_dispersion: f64,
    /// Nonlinear coefficient (1/(W·km)); derived from n2 and A_eff when absent
    pub nonlinear_gamma: Option<f64>,
    /// Effective area (m²)
    pub effective_area: f64,
    /// Core radius (m)
    pub core_radius: f64,
    /// Core refractive index
    pub core_refractive_index: f64,
    /// Nonlinear refractive index (m²/W)
    pub nonlinear_index_coefficient: f64,
}

impl Default for FiberConfig {
    fn default() -> Self {
        // SSMF, 0.25/0.30 dB connectors
        Self {
            length: 80.0,
            loss_coef_db_per_km: 0.2,
            length_units: LengthUnits::Km,
            input_attenuation_db: 0.0,
            input_connector_loss_db: 0.25,
            output_connector_loss_db: 0.30,
            pmd_coefficient: 0.1,
            chromatic_dispersion: 16.5,
            nonlinear_gamma: Some(1.2),
            effective_area: 80e-12,
            core_radius: 4.2e-6,
            core_refractive_index: 1.468,
            nonlinear_index_coefficient: 2.6e-20,
        }
    }
}

impl FiberConfig {
    pub fn with_length(length_km: f64) -> Self {
        Self {
            length: length_km,
            ..Default::default()
        }
    }

    /// Set the span length from a value in km, keeping `length_units`
    pub fn set_length_km(&mut self, length_km: f64) {
        self.length = length_km * 1000.0 / self.length_units.meters_per_unit();
    }

    pub fn length_m(&self) -> f64 {
        self.length * self.length_units.meters_per_unit()
    }

    pub fn length_km(&self) -> f64 {
        self.length_m() / 1000.0
    }

    /// Field attenuation coefficient (1/m)
    pub fn alpha0(&self) -> f64 {
        self.loss_coef_db_per_km / (20.0 * E.log10()) / 1000.0
    }

    pub fn effective_length_m(&self) -> f64 {
        let alpha0 = self.alpha0();
        if alpha0 > 0.0 {
            (1.0 - (-2.0 * alpha0 * self.length_m()).exp()) / (2.0 * alpha0)
        } else {
            self.length_m()
        }
    }

    pub fn asymptotic_length_m(&self) -> f64 {
        let alpha0 = self.alpha0();
        if alpha0 > 0.0 {
            1.0 / (2.0 * alpha0)
        } else {
            self.length_m()
        }
    }

    /// Dispersion (s/m²)
    pub fn dispersion_si(&self) -> f64 {
        self.chromatic_dispersion * 1e-6
    }

    /// GVD at the reference frequency (s²/m)
    pub fn beta2(&self) -> f64 {
        let wavelength = SPEED_OF_LIGHT / REFERENCE_FREQUENCY_HZ;
        -self.dispersion_si() * wavelength.powi(2) / (2.0 * PI * SPEED_OF_LIGHT)
    }

    /// Nonlinear coefficient (1/(W·m))
    pub fn gamma(&self) -> f64 {
        match self.nonlinear_gamma {
            Some(gamma_per_w_km) => gamma_per_w_km * 1e-3,
            None => {
                2.0 * PI * self.nonlinear_index_coefficient * REFERENCE_FREQUENCY_HZ
                    / (SPEED_OF_LIGHT * self.effective_area)
            }
        }
    }

    /// Loss between span input and output, connectors included (dB)
    pub fn loss_db(&self) -> f64 {
        self.input_attenuation_db
            + self.input_connector_loss_db
            + self.loss_coef_db_per_km * self.length_km()
            + self.output_connector_loss_db
    }

    fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(EngineError::invalid(
                "length",
                format!("must be finite and >= 0, got {}", self.length),
            ));
        }
        if !self.loss_coef_db_per_km.is_finite() || self.loss_coef_db_per_km < 0.0 {
            return Err(EngineError::invalid(
                "loss_coef",
                format!("must be finite and >= 0, got {}", self.loss_coef_db_per_km),
            ));
        }
        let connectors = [
            ("att_in", self.input_attenuation_db),
            ("con_in", self.input_connector_loss_db),
            ("con_out", self.output_connector_loss_db),
        ];
        for (name, loss_db) in connectors {
            if !loss_db.is_finite() {
                return Err(EngineError::invalid(name, format!("must be finite, got {}", loss_db)));
            }
        }
        if !(self.effective_area > 0.0) {
            return Err(EngineError::invalid(
                "effective_area",
                format!("must be > 0, got {}", self.effective_area),
            ));
        }
        if !(self.core_refractive_index >= 1.0) {
            return Err(EngineError::invalid(
                "n1",
                format!("must be >= 1, got {}", self.core_refractive_index),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Fiber {
    uid: String,
    params: FiberConfig,
    ref_pch_in_dbm: Option<f64>,
}

impl Fiber {
    pub fn new(uid: impl Into<String>, params: FiberConfig) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            uid: uid.into(),
            params,
            ref_pch_in_dbm: None,
        })
    }

    pub fn params(&self) -> &FiberConfig {
        &self.params
    }

    pub fn ref_pch_in_dbm(&self) -> Option<f64> {
        self.ref_pch_in_dbm
    }

    pub fn ref_pch_out_dbm(&self) -> Option<f64> {
        self.ref_pch_in_dbm.map(|p| p - self.params.loss_db())
    }

    pub fn gn_model(&self) -> GnModel {
        GnModel {
            gamma: self.params.gamma(),
            beta2: self.params.beta2(),
            effective_length: self.params.effective_length_m(),
            asymptotic_length: self.params.asymptotic_length_m(),
        }
    }
}

impl TransmissionElement for Fiber {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn set_ref_pch_in_dbm(&mut self, power_dbm: f64) {
        self.ref_pch_in_dbm = Some(power_dbm);
    }

    fn propagate(&mut self, mut si: SpectralInformation) -> Result<SpectralInformation> {
        si.check_shape()?;
        let p = &self.params;
        let length_m = p.length_m();

        si.apply_attenuation_db(p.input_attenuation_db + p.input_connector_loss_db);

        let nli = if length_m > 0.0 {
            self.gn_model().nli_per_channel(&si)?
        } else {
            vec![0.0; si.num_channels()]
        };
        for (acc, generated) in si.nli.iter_mut().zip(&nli) {
            *acc += generated;
        }

        si.apply_attenuation_db(p.loss_coef_db_per_km * p.length_km() + p.output_connector_loss_db);

        let dispersion = p.dispersion_si() * length_m;
        let dgd = p.pmd_coefficient * 1e-12 * p.length_km().sqrt();
        let delay = length_m * p.core_refractive_index / SPEED_OF_LIGHT;
        for i in 0..si.num_channels() {
            si.chromatic_dispersion[i] += dispersion;
            si.pmd[i] = si.pmd[i].hypot(dgd);
            si.latency[i] += delay;
        }

        let total_nli_mw: f64 = nli.iter().sum();
        debug!(
            "{}: {:.2} km, loss {:.2} dB, generated NLI {:.4} dBm",
            self.uid,
            p.length_km(),
            p.loss_db(),
            lin2db(total_nli_mw)
        );
        if let (Some(ref_in), Some(ref_out)) = (self.ref_pch_in_dbm, self.ref_pch_out_dbm()) {
            info!(
                "{}: reference power {:.2} dBm in, {:.2} dBm out",
                self.uid, ref_in, ref_out
            );
        }

        Ok(si)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::create_input_spectral_information;
    use optical_core::SpectrumParams;
    use proptest::prelude::*;

    fn comb() -> SpectralInformation {
        create_input_spectral_information(&SpectrumParams {
            f_min: 191.4e12,
            f_max: 195.1e12,
            roll_off: 0.15,
            baud_rate: 32e9,
            spacing: 50e9,
            tx_osnr: 40.0,
            tx_power: 6.0,
            delta_pdb: 0.0,
            slot_width: 50e9,
        })
        .unwrap()
    }

    fn total_mw(v: &[f64]) -> f64 {
        v.iter().sum()
    }

    #[test]
    fn test_span_loss_applied_to_signal() {
        let mut fiber = Fiber::new("Fiber1", FiberConfig::with_length(80.0)).unwrap();
        let si = comb();
        let input = total_mw(&si.signal);
        let out = fiber.propagate(si).unwrap();

        let loss = lin2db(input / total_mw(&out.signal));
        assert!((loss - 16.55).abs() < 1e-9, "Span loss {} dB", loss);
    }

    #[test]
    fn test_nli_accumulated_and_attenuated() {
        let mut fiber = Fiber::new("Fiber1", FiberConfig::with_length(80.0)).unwrap();
        let out = fiber.propagate(comb()).unwrap();

        assert!(out.nli.iter().all(|&n| n > 0.0));
        assert!(out.ase.iter().all(|&a| a == 0.0));

        let osnr = lin2db(total_mw(&out.signal) / total_mw(&out.nli));
        assert!(osnr > 15.0 && osnr < 25.0, "NLI-limited SNR {} dB", osnr);
    }

    #[test]
    fn test_dispersion_pmd_latency() {
        let mut fiber = Fiber::new("Fiber1", FiberConfig::with_length(100.0)).unwrap();
        let out = fiber.propagate(comb()).unwrap();

        // 16.5 ps/nm/km x 100 km = 1650 ps/nm = 1.65 s/m
        assert!((out.chromatic_dispersion[0] - 1.65).abs() < 1e-9);
        // 0.1 ps/sqrt(km) x 10 = 1 ps
        assert!((out.pmd[0] - 1e-12).abs() < 1e-18);
        assert!((out.latency[0] - 100e3 * 1.468 / SPEED_OF_LIGHT).abs() < 1e-12);
    }

    #[test]
    fn test_meter_length_units() {
        let config = FiberConfig {
            length: 80_000.0,
            length_units: LengthUnits::M,
            ..Default::default()
        };
        assert!((config.length_km() - 80.0).abs() < 1e-12);
        assert!((config.loss_db() - 16.55).abs() < 1e-9);
    }

    #[test]
    fn test_gamma_derived_from_n2() {
        let config = FiberConfig {
            nonlinear_gamma: None,
            ..Default::default()
        };
        let gamma_per_w_km = config.gamma() * 1e3;
        assert!(gamma_per_w_km > 1.2 && gamma_per_w_km < 1.4, "gamma {}", gamma_per_w_km);
    }

    #[test]
    fn test_reference_power_bookkeeping() {
        let mut fiber = Fiber::new("Fiber1", FiberConfig::with_length(80.0)).unwrap();
        assert!(fiber.ref_pch_out_dbm().is_none());

        fiber.set_ref_pch_in_dbm(24.69);
        assert!((fiber.ref_pch_out_dbm().unwrap() - 8.14).abs() < 1e-9);
    }

    #[test]
    fn test_negative_length_rejected() {
        let err = Fiber::new("Fiber1", FiberConfig::with_length(-1.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "length", .. }));
    }

    #[test]
    fn test_non_finite_length_rejected() {
        for length in [f64::INFINITY, f64::NAN] {
            let err = Fiber::new("Fiber1", FiberConfig::with_length(length)).unwrap_err();
            assert!(matches!(err, EngineError::InvalidParameter { name: "length", .. }));
        }
    }

    #[test]
    fn test_non_finite_losses_rejected() {
        let config = FiberConfig {
            loss_coef_db_per_km: f64::INFINITY,
            ..FiberConfig::with_length(80.0)
        };
        let err = Fiber::new("Fiber1", config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "loss_coef", .. }));

        let config = FiberConfig {
            output_connector_loss_db: f64::NAN,
            ..FiberConfig::with_length(80.0)
        };
        let err = Fiber::new("Fiber1", config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "con_out", .. }));
    }

    #[test]
    fn test_set_length_km_respects_units() {
        let mut config = FiberConfig {
            length_units: LengthUnits::M,
            ..Default::default()
        };
        config.set_length_km(80.0);

        assert_eq!(config.length, 80_000.0);
        assert!((config.length_km() - 80.0).abs() < 1e-12);
        assert!((config.loss_db() - 16.55).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_span_only_connectors() {
        let mut fiber = Fiber::new("Fiber1", FiberConfig::with_length(0.0)).unwrap();
        let si = comb();
        let input = total_mw(&si.signal);
        let out = fiber.propagate(si).unwrap();

        assert!((lin2db(input / total_mw(&out.signal)) - 0.55).abs() < 1e-9);
        // L_eff = 0 so no NLI is generated
        assert!(out.nli.iter().all(|&n| n == 0.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn fuzz_signal_loss_matches_budget(length in 0f64..200.0, att_in in 0f64..10.0) {
            let config = FiberConfig {
                input_attenuation_db: att_in,
                ..FiberConfig::with_length(length)
            };
            let expected = config.loss_db();
            let mut fiber = Fiber::new("Fiber1", config).unwrap();
            let si = comb();
            let input = total_mw(&si.signal);
            let out = fiber.propagate(si).unwrap();

            prop_assert!((lin2db(input / total_mw(&out.signal)) - expected).abs() < 1e-9);
            prop_assert!(out.nli.iter().all(|&n| n >= 0.0));
        }
    }

    #[test]
    fn test_config_from_json_alias() {
        let config: FiberConfig =
            serde_json::from_str(r#"{"length_km": 40.0, "length_units": "km"}"#).unwrap();
        assert_eq!(config.length, 40.0);
        assert_eq!(config.input_connector_loss_db, 0.25);
    }
}
