//! Payload cache port definition

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Cache of generated large payloads keyed by their byte size
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PayloadCachePort: Send + Sync {
    async fn get(&self, size: usize) -> Option<Arc<str>>;

    async fn insert(&self, size: usize, payload: Arc<str>);
}
