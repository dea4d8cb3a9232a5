//! Optical Elements Library
//!
//! Default propagation engine for a single unamplified span:
//! - `InputSpectrumSource`: uniform WDM comb from transmitter settings
//! - `Fiber`: connector and span loss, GN-model NLI, CD/PMD/latency accumulation
//! - `Transceiver`: per-channel OSNR/GSNR evaluation at the line end

pub mod fiber;
pub mod nli;
pub mod source;
pub mod transceiver;

pub use fiber::{Fiber, FiberConfig, LengthUnits};
pub use nli::GnModel;
pub use source::{create_input_spectral_information, InputSpectrumSource};
pub use transceiver::{ChannelMetrics, Transceiver};
