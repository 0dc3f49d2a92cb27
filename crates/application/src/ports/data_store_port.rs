//! Data store port definition

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::SimulationError;

/// Key-value store the `store` source reads from
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DataStorePort: Send + Sync {
    /// Look up a stored value; `Ok(None)` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<Value>, SimulationError>;

    /// Number of stored keys
    async fn key_count(&self) -> usize;
}
