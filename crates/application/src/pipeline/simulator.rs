//! Simulator contract
//!
//! [`Simulator`] is what the engine runs: one object-safe layer addressed
//! by a namespace. Concrete faults are written as [`FaultSimulator`]
//! strategies and wrapped in [`Gated`], which reads the namespace slice,
//! rolls the probability gate and only then hands a typed
//! [`SimulatorContext`] to the strategy.

use std::fmt;

use async_trait::async_trait;
use domain::{DomainError, Payload, ProbabilityResult};
use rand::Rng;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use super::{Exchange, RequestMeta, ResponseDraft, SimulatedResponse};
use crate::error::SimulationError;

/// Result of one layer
#[derive(Debug)]
pub enum Step {
    /// Hand the exchange to the next layer
    Continue(Exchange),
    /// The response is decided; no further layer runs
    Terminated(SimulatedResponse),
}

impl Step {
    pub const fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

/// One layer of the pipeline
#[async_trait]
pub trait Simulator: Send + Sync + fmt::Debug {
    /// Settings namespace, unique within a registry
    fn namespace(&self) -> &str;

    /// Check a settings slice addressed to this layer
    fn validate(&self, _slice: &Value) -> Result<(), SimulationError> {
        Ok(())
    }

    /// Handle one request
    async fn ingest(&self, exchange: Exchange) -> Result<Step, SimulationError>;
}

/// The fault logic of a gated simulator
#[async_trait]
pub trait FaultSimulator: Send + Sync + fmt::Debug {
    /// Typed form of the namespace slice
    type Settings: DeserializeOwned + Send;

    fn namespace(&self) -> &'static str;

    /// Invariants of the settings serde cannot express
    fn check(&self, _settings: &Self::Settings) -> Result<(), DomainError> {
        Ok(())
    }

    /// Inject the fault; only called when the gate selected it
    async fn evaluate(
        &self,
        ctx: SimulatorContext<Self::Settings>,
    ) -> Result<Step, SimulationError>;
}

/// Per-invocation bundle handed to [`FaultSimulator::evaluate`]
#[derive(Debug)]
pub struct SimulatorContext<T> {
    /// The simulator's own settings slice
    pub settings: T,
    /// The gate roll that selected the fault
    pub probability: ProbabilityResult,
    exchange: Exchange,
}

impl<T> SimulatorContext<T> {
    pub const fn new(settings: T, probability: ProbabilityResult, exchange: Exchange) -> Self {
        Self {
            settings,
            probability,
            exchange,
        }
    }

    pub const fn body(&self) -> &Payload {
        &self.exchange.body
    }

    pub fn body_mut(&mut self) -> &mut Payload {
        &mut self.exchange.body
    }

    pub fn request(&self) -> &RequestMeta {
        &self.exchange.request
    }

    pub fn response_mut(&mut self) -> &mut ResponseDraft {
        &mut self.exchange.response
    }

    /// Continue with the next layer
    pub fn proceed(self) -> Step {
        Step::Continue(self.exchange)
    }

    /// Terminate the request with `response`
    pub fn respond(self, response: impl Into<SimulatedResponse>) -> Step {
        Step::Terminated(response.into())
    }

    pub fn into_exchange(self) -> Exchange {
        self.exchange
    }
}

/// Adapts a [`FaultSimulator`] to the [`Simulator`] contract
pub struct Gated<S> {
    inner: S,
}

impl<S: FaultSimulator> Gated<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    pub const fn inner(&self) -> &S {
        &self.inner
    }

    fn decode(&self, slice: &Value) -> Result<S::Settings, SimulationError> {
        let settings = S::Settings::deserialize(slice)
            .map_err(|e| DomainError::invalid_settings(self.inner.namespace(), e))?;
        self.inner.check(&settings)?;
        Ok(settings)
    }
}

impl<S: fmt::Debug> fmt::Debug for Gated<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Gated").field(&self.inner).finish()
    }
}

#[async_trait]
impl<S: FaultSimulator> Simulator for Gated<S> {
    fn namespace(&self) -> &str {
        self.inner.namespace()
    }

    fn validate(&self, slice: &Value) -> Result<(), SimulationError> {
        self.decode(slice).map(drop)
    }

    async fn ingest(&self, exchange: Exchange) -> Result<Step, SimulationError> {
        let namespace = self.inner.namespace();
        let shared = std::sync::Arc::clone(&exchange.settings);
        let Some(slice) = shared.slice(namespace) else {
            return Ok(Step::Continue(exchange));
        };

        let probability = shared
            .failure_probability
            .check(rand::rng().random::<f64>());
        if probability.passed {
            trace!(namespace, random = probability.random, "Fault not selected");
            return Ok(Step::Continue(exchange));
        }

        let settings = self.decode(slice)?;
        debug!(namespace, random = probability.random, "Fault selected");
        self.inner
            .evaluate(SimulatorContext::new(settings, probability, exchange))
            .await
    }
}
