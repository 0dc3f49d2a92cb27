//! In-memory data store loaded from a JSON file

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use application::{DataStorePort, SimulationError};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors loading the store file
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read
    #[error("Failed to read store file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid JSON
    #[error("Failed to parse store file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The top level value is not an object
    #[error("Store data must be a JSON object keyed by store key")]
    NotAnObject,
}

/// Read-only key-value store backed by one JSON object
///
/// The data is loaded once at startup and never written back.
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore {
    entries: Arc<HashMap<String, Value>>,
}

impl JsonFileStore {
    /// A store without keys
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from a JSON object
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let Value::Object(map) = value else {
            return Err(StoreError::NotAnObject);
        };
        Ok(Self {
            entries: Arc::new(map.into_iter().collect()),
        })
    }

    /// Load a store from a JSON object file
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_value(value)?;
        info!(keys = store.entries.len(), "Loaded data store");
        Ok(store)
    }
}

#[async_trait]
impl DataStorePort for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, SimulationError> {
        Ok(self.entries.get(key).cloned())
    }

    async fn key_count(&self) -> usize {
        self.entries.len()
    }
}
