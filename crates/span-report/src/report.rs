//! Span report
//!
//! `Display` renders the labelled text block written to stdout; `Serialize`
//! feeds the JSON export.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::expectation::ExpectedBudget;
use crate::reporter::{OsnrSummary, PowerReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanReport {
    pub min_frequency_thz: f64,
    pub num_channels: usize,
    pub pre_fiber: PowerReport,
    pub post_fiber: PowerReport,
    pub received: PowerReport,
    pub expected: ExpectedBudget,
    pub osnr: OsnrSummary,
    pub generated_at: DateTime<Utc>,
}

impl SpanReport {
    pub fn new(
        sim: &SimulationConfig,
        pre_fiber: PowerReport,
        post_fiber: PowerReport,
        received: PowerReport,
        expected: ExpectedBudget,
        osnr: OsnrSummary,
    ) -> Self {
        Self {
            min_frequency_thz: sim.min_frequency / 1e12,
            num_channels: sim.num_channels(),
            pre_fiber,
            post_fiber,
            received,
            expected,
            osnr,
            generated_at: Utc::now(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SpanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frecuencia mínima: {:.2} THz", self.min_frequency_thz)?;
        writeln!(f, "Número de canales: {}", self.num_channels)?;
        writeln!(f, "Power de canal (mW): {:.4}", self.expected.channel_power)?;
        writeln!(f, "Power total (w): {:.4}", self.expected.total_input_power)?;
        writeln!(f, "Power total (dBm): {:.4}", self.expected.total_input_power_dbm)?;

        writeln!(f)?;
        writeln!(f, "Resultados:")?;
        writeln!(
            f,
            "Potencia de la señal antes de la fibra (dBm): {:.4}",
            self.pre_fiber.power_dbm
        )?;
        writeln!(
            f,
            "Potencia de la señal después de la fibra (dBm): {:.2}",
            self.post_fiber.power_dbm
        )?;
        writeln!(
            f,
            "Potencia de la señal recibida (dBm): {:.2}",
            self.received.power_dbm
        )?;

        writeln!(f)?;
        writeln!(
            f,
            "Potencia esperada antes de la fibra (dBm): {:.2}",
            self.expected.total_input_power_dbm
        )?;
        writeln!(f, "Atenuación esperada (dB): {:.2}", self.expected.attenuation_db)?;
        writeln!(
            f,
            "Potencia esperada después de la fibra (dBm): {:.2}",
            self.expected.output_power_dbm
        )?;

        writeln!(f)?;
        writeln!(f, "Resultados de OSNR:")?;
        writeln!(f, "OSNR en el transmisor (dB): {:.2}", self.osnr.transmitter.osnr_db)?;
        writeln!(f, "OSNR antes de la fibra (dB): {:.2}", self.osnr.pre_fiber.osnr_db)?;
        writeln!(f, "OSNR después de la fibra (dB): {:.2}", self.osnr.post_fiber.osnr_db)?;
        write!(f, "OSNR en el receptor (dB): {:.2}", self.osnr.receiver.osnr_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FiberConfig;
    use crate::reporter::OsnrReport;

    fn sample() -> SpanReport {
        let sim = SimulationConfig::default();
        let expected = ExpectedBudget::compute(&sim, &FiberConfig::with_length(80.0));
        let power = |dbm: f64| PowerReport {
            power_watts: 10f64.powf((dbm - 30.0) / 10.0),
            power_dbm: dbm,
        };
        SpanReport::new(
            &sim,
            power(24.692_317),
            power(8.142_317),
            power(8.142_317),
            expected,
            OsnrSummary {
                transmitter: OsnrReport::transmitter(&sim),
                pre_fiber: OsnrReport::transmitter(&sim),
                post_fiber: OsnrReport { osnr_db: 19.167 },
                receiver: OsnrReport { osnr_db: 19.167 },
            },
        )
    }

    #[test]
    fn test_text_layout() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Frecuencia mínima: 191.40 THz");
        assert_eq!(lines[1], "Número de canales: 74");
        assert_eq!(lines[2], "Power de canal (mW): 3.9811");
        assert_eq!(lines[3], "Power total (w): 294.5993");
        assert_eq!(lines[4], "Power total (dBm): 24.6923");
        assert_eq!(lines[5], "");
        assert_eq!(lines[7], "Potencia de la señal antes de la fibra (dBm): 24.6923");
        assert_eq!(lines[8], "Potencia de la señal después de la fibra (dBm): 8.14");
        assert_eq!(lines[12], "Atenuación esperada (dB): 16.55");
        assert_eq!(lines[13], "Potencia esperada después de la fibra (dBm): 8.14");
        assert_eq!(lines[16], "OSNR en el transmisor (dB): 40.00");
        assert_eq!(lines[19], "OSNR en el receptor (dB): 19.17");
        assert_eq!(lines.len(), 20);
    }

    #[test]
    fn test_json_export() {
        let report = sample();
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["num_channels"], 74);
        assert_eq!(value["osnr"]["transmitter"]["osnr_db"], 40.0);
        assert!(value["generated_at"].is_string());

        let back: SpanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.num_channels, report.num_channels);
        assert_eq!(back.generated_at, report.generated_at);
    }
}
