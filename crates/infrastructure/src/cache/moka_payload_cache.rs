//! Moka cache of generated large payloads
//!
//! Entries are weighed by their byte length, so the configured capacity
//! bounds the memory held by cached payloads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use application::PayloadCachePort;
use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::config::PayloadCacheConfig;

/// Moka-based [`PayloadCachePort`]
pub struct MokaPayloadCache {
    cache: Cache<usize, Arc<str>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MokaPayloadCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaPayloadCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MokaPayloadCache {
    /// Create a cache with the given configuration
    #[must_use]
    pub fn with_config(config: PayloadCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity_mb * 1024 * 1024)
            .time_to_live(config.ttl())
            .weigher(|_size: &usize, value: &Arc<str>| -> u32 {
                // Weight by size in bytes, capped at u32::MAX
                value.len().try_into().unwrap_or(u32::MAX)
            })
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Number of cache hits so far
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of cache misses so far
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for MokaPayloadCache {
    fn default() -> Self {
        Self::with_config(PayloadCacheConfig::default())
    }
}

#[async_trait]
impl PayloadCachePort for MokaPayloadCache {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, size: usize) -> Option<Arc<str>> {
        let cached = self.cache.get(&size).await;
        if cached.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(size, "Payload cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(size, "Payload cache miss");
        }
        cached
    }

    #[instrument(skip(self, payload), level = "debug")]
    async fn insert(&self, size: usize, payload: Arc<str>) {
        self.cache.insert(size, payload).await;
    }
}
