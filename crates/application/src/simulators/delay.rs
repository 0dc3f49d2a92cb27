//! Delay simulator

use std::time::Duration;

use async_trait::async_trait;
use domain::{DelayDescriptor, DomainError, Namespace};
use rand::Rng;
use tracing::{info, warn};

use crate::error::SimulationError;
use crate::pipeline::{
    DribblePlan, FaultSimulator, Headers, SimulatedResponse, SimulatorContext, Step,
};

/// Delays or dribbles the response
#[derive(Debug, Default, Clone, Copy)]
pub struct DelaySimulator;

impl DelaySimulator {
    fn dribble(
        ctx: SimulatorContext<DelayDescriptor>,
        number_of_chunks: usize,
        duration_ms: u64,
    ) -> Step {
        let plan = DribblePlan::new(&ctx.body().render(), number_of_chunks, duration_ms);
        if plan.is_empty() {
            return ctx.proceed();
        }

        info!(
            namespace = Namespace::DELAY,
            chunks = plan.chunks().len(),
            duration_ms,
            "Dribbling response"
        );
        let mut headers = Headers::new();
        headers.set("transfer-encoding", "chunked");
        headers.set("content-type", "text/event-stream");
        ctx.respond(SimulatedResponse::Dribble { headers, plan })
    }
}

#[async_trait]
impl FaultSimulator for DelaySimulator {
    type Settings = DelayDescriptor;

    fn namespace(&self) -> &'static str {
        Namespace::DELAY
    }

    fn check(&self, settings: &DelayDescriptor) -> Result<(), DomainError> {
        settings.validate()
    }

    async fn evaluate(
        &self,
        ctx: SimulatorContext<DelayDescriptor>,
    ) -> Result<Step, SimulationError> {
        match ctx.settings {
            DelayDescriptor::Fixed { delay } => {
                info!(namespace = Namespace::DELAY, delay_ms = delay, "Fixed delay");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(ctx.proceed())
            },
            DelayDescriptor::Random { from, to } => {
                let delay = rand::rng().random_range(from..=to);
                info!(namespace = Namespace::DELAY, delay_ms = delay, "Random delay");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(ctx.proceed())
            },
            DelayDescriptor::ChunkedDribble {
                number_of_chunks,
                duration_ms,
            } => Ok(Self::dribble(ctx, number_of_chunks, duration_ms)),
            ref other @ (DelayDescriptor::Lognormal { .. } | DelayDescriptor::Uniform { .. }) => {
                warn!(
                    namespace = Namespace::DELAY,
                    kind = other.kind(),
                    "Delay type not implemented"
                );
                Ok(ctx.proceed())
            },
        }
    }
}
