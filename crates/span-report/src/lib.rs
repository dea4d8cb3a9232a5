//! Span Report Library
//!
//! Orchestration and reporting layer for one fiber span:
//!
//! ```text
//! SimulationConfig ──► SpectralSourceFactory ──► TransmissionElement ──► ReceiverElement
//!                              │                         │                       │
//!                              ▼                         ▼                       ▼
//!                        pre-fiber power          post-fiber power/OSNR   received power/OSNR
//! ```
//!
//! The engine is reached only through the `optical_core` traits, so the
//! reporter and expectation calculator can be driven by stubs.

use thiserror::Error;

pub mod config;
pub mod expectation;
pub mod pipeline;
pub mod report;
pub mod reporter;

pub use config::{FiberConfig, LengthUnits, SimulationConfig, SpanConfig};
pub use expectation::{expected_attenuation_db, ExpectedBudget, FiberDescription};
pub use pipeline::SpanPipeline;
pub use report::SpanReport;
pub use reporter::{osnr_db, total_power_dbm, total_power_w, OsnrReport, OsnrSummary, PowerReport};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Engine(#[from] optical_core::EngineError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
