//! Span pipeline driver
//!
//! Source → fiber → receiver, measuring at every stage. Engine errors are
//! returned as-is; nothing is retried.

use optical_core::{ReceiverElement, SpectralSourceFactory, TransmissionElement};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::expectation::{ExpectedBudget, FiberDescription};
use crate::report::SpanReport;
use crate::reporter::{OsnrReport, OsnrSummary, PowerReport};
use crate::Result;

pub struct SpanPipeline<S, T, R> {
    source: S,
    fiber: T,
    receiver: R,
}

impl<S, T, R> SpanPipeline<S, T, R>
where
    S: SpectralSourceFactory,
    T: TransmissionElement + FiberDescription,
    R: ReceiverElement,
{
    pub fn new(source: S, fiber: T, receiver: R) -> Self {
        Self {
            source,
            fiber,
            receiver,
        }
    }

    pub fn fiber(&self) -> &T {
        &self.fiber
    }

    pub fn receiver(&self) -> &R {
        &self.receiver
    }

    pub fn into_parts(self) -> (S, T, R) {
        (self.source, self.fiber, self.receiver)
    }

    /// Run the span once. The analytical expectation is taken from the
    /// fiber element's own parameters.
    pub fn run(&mut self, sim: &SimulationConfig) -> Result<SpanReport> {
        let si = self.source.create(&sim.spectrum_params())?;
        si.check_shape()?;
        info!(
            "Created input spectrum: {} channels from {:.2} THz",
            si.num_channels(),
            sim.min_frequency / 1e12
        );

        let pre_fiber = PowerReport::measure(&si);
        let expected = ExpectedBudget::compute(sim, self.fiber.fiber_config());
        debug!("Pre-fiber power {:.4} dBm", pre_fiber.power_dbm);

        self.fiber.set_ref_pch_in_dbm(pre_fiber.power_dbm);
        let si_after_fiber = self.fiber.propagate(si)?;
        let post_fiber = PowerReport::measure(&si_after_fiber);
        let post_fiber_osnr = OsnrReport::measure(&si_after_fiber, sim);
        info!(
            "Propagated through {}: {:.2} dBm",
            self.fiber.uid(),
            post_fiber.power_dbm
        );

        let si_received = self.receiver.receive(si_after_fiber)?;
        let received = PowerReport::measure(&si_received);
        let receiver_osnr = OsnrReport::measure(&si_received, sim);
        info!(
            "Received at {}: {:.2} dBm",
            self.receiver.uid(),
            received.power_dbm
        );

        let osnr = OsnrSummary {
            transmitter: OsnrReport::transmitter(sim),
            pre_fiber: OsnrReport::transmitter(sim),
            post_fiber: post_fiber_osnr,
            receiver: receiver_osnr,
        };

        Ok(SpanReport::new(sim, pre_fiber, post_fiber, received, expected, osnr))
    }
}
