//! Closed-form power expectation
//!
//! Independent of engine output; printed next to the measured values as a
//! sanity check.
//!
//! Units: `channel_power = 10^(tx_power_dbm/10)` is a per-channel power in mW,
//! and `total_input_power` is its sum over channels, still in mW. It is
//! divided by 1000 before `watt2dbm`, which lands on the same dBm figure as
//! the measured path. The field is labelled "(w)" in the text report for
//! compatibility with existing output parsers even though the value is mW.

use optical_core::units::watt2dbm;
use optical_elements::Fiber;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{FiberConfig, SimulationConfig};

/// Element that can hand its datasheet figures to the budget, so the
/// expectation always describes the span that was propagated through.
pub trait FiberDescription {
    fn fiber_config(&self) -> &FiberConfig;
}

impl FiberDescription for Fiber {
    fn fiber_config(&self) -> &FiberConfig {
        self.params()
    }
}

/// Span attenuation from the datasheet figures (dB).
///
/// `loss_coef × length + con_in + con_out`; the input attenuator is not part
/// of the figure.
pub fn expected_attenuation_db(fiber: &FiberConfig) -> f64 {
    fiber.loss_coef_db_per_km * fiber.length_km()
        + fiber.input_connector_loss_db
        + fiber.output_connector_loss_db
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedBudget {
    pub num_channels: usize,
    /// Per-channel power, linear (mW)
    pub channel_power: f64,
    /// `num_channels × channel_power` (mW)
    pub total_input_power: f64,
    pub total_input_power_dbm: f64,
    pub attenuation_db: f64,
    pub output_power_dbm: f64,
}

impl ExpectedBudget {
    pub fn compute(sim: &SimulationConfig, fiber: &FiberConfig) -> Self {
        let num_channels = sim.num_channels();
        let channel_power = 10f64.powf(sim.tx_power_dbm / 10.0);
        let total_input_power = num_channels as f64 * channel_power;
        let total_input_power_dbm = watt2dbm(total_input_power / 1000.0);
        let attenuation_db = expected_attenuation_db(fiber);
        let output_power_dbm = total_input_power_dbm - attenuation_db;

        debug!(
            "Expected budget: {} ch, {:.2} dBm in, {:.2} dB loss, {:.2} dBm out",
            num_channels, total_input_power_dbm, attenuation_db, output_power_dbm
        );

        Self {
            num_channels,
            channel_power,
            total_input_power,
            total_input_power_dbm,
            attenuation_db,
            output_power_dbm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_budget() {
        let budget = ExpectedBudget::compute(&SimulationConfig::default(), &FiberConfig::with_length(80.0));

        assert_eq!(budget.num_channels, 74);
        assert!((budget.channel_power - 3.981_071_705_534_973).abs() < 1e-12);
        assert!((budget.total_input_power - 294.599_306_209_588).abs() < 1e-9);
        assert!((budget.total_input_power_dbm - 24.692_317_197_309_76).abs() < 1e-9);
        assert!((budget.attenuation_db - 16.55).abs() < 1e-12);
        assert!((budget.output_power_dbm - (budget.total_input_power_dbm - 16.55)).abs() < 1e-12);
        assert_eq!(format!("{:.2}", budget.output_power_dbm), "8.14");
    }

    #[test]
    fn test_input_attenuator_excluded() {
        let fiber = FiberConfig {
            input_attenuation_db: 3.0,
            ..FiberConfig::with_length(80.0)
        };
        assert!((expected_attenuation_db(&fiber) - 16.55).abs() < 1e-12);
    }

    #[test]
    fn test_illustrative_output_power() {
        // 24.69 dBm in, 16.55 dB span
        assert!((24.69 - expected_attenuation_db(&FiberConfig::with_length(80.0)) - 8.14).abs() < 1e-9);
    }

    #[test]
    fn test_fiber_element_describes_its_config() {
        let config = FiberConfig {
            loss_coef_db_per_km: 0.17,
            ..FiberConfig::with_length(100.0)
        };
        let fiber = Fiber::new("Fiber1", config.clone()).unwrap();

        assert_eq!(fiber.fiber_config(), &config);
        assert!((expected_attenuation_db(fiber.fiber_config()) - 17.55).abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_only_connectors() {
        assert!((expected_attenuation_db(&FiberConfig::with_length(0.0)) - 0.55).abs() < 1e-12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn fuzz_attenuation_linear_in_length(length in 0f64..500.0, loss in 0f64..1.0) {
            let mut fiber = FiberConfig::with_length(length);
            fiber.loss_coef_db_per_km = loss;
            let single = expected_attenuation_db(&fiber);
            fiber.length = 2.0 * length;
            let doubled = expected_attenuation_db(&fiber);

            prop_assert!((doubled - single - loss * length).abs() < 1e-9);
        }
    }
}
