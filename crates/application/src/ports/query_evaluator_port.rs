//! Query evaluator port definition

#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::SimulationError;

/// Evaluates a query expression against stored data
///
/// The data passed in is `{ <storeKey>: <stored value> }`. Failures are
/// reported as [`SimulationError::Query`] carrying the query text.
#[cfg_attr(test, automock)]
pub trait QueryEvaluatorPort: Send + Sync {
    fn evaluate(&self, query: &str, data: &Value) -> Result<Value, SimulationError>;
}
