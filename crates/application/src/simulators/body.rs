//! Body mutator
//!
//! Operations run in a fixed order on every selected request:
//! encoding override, large payload, large file, random content type,
//! fake compression, random removal. A large file request terminates the
//! request with its own report, so nothing after it runs.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{BodyMutationSettings, Charset, LargeFileTier, Namespace, Payload};
use rand::Rng;
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::SimulationError;
use crate::pipeline::{FaultSimulator, Reply, SimulatorContext, Step};
use crate::ports::{LargeFilePort, PayloadCachePort};

/// Content types the random content type operation picks from
pub const MIME_CATALOG: [&str; 20] = [
    "application/javascript",
    "application/json",
    "application/x-www-form-urlencoded",
    "application/xml",
    "application/zip",
    "application/pdf",
    "application/sql",
    "application/graphql",
    "audio/mpeg",
    "audio/ogg",
    "multipart/form-data",
    "text/css",
    "text/html",
    "text/xml",
    "text/csv",
    "text/plain",
    "image/png",
    "image/jpeg",
    "image/gif",
    "application/vnd.api+json",
];

/// Smallest accepted large payload in megabytes
pub const MIN_PAYLOAD_MB: f64 = 0.001;
/// Largest accepted large payload in megabytes
pub const MAX_PAYLOAD_MB: f64 = 50.0;
const BYTES_PER_MB: f64 = 1_048_576.0;

/// Default public prefix of large file download links
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "/api/v1/mock/largefile";

/// Mutates the response body
#[derive(Clone)]
pub struct BodyMutator {
    payload_cache: Arc<dyn PayloadCachePort>,
    large_files: Arc<dyn LargeFilePort>,
    download_prefix: String,
}

impl fmt::Debug for BodyMutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyMutator")
            .field("download_prefix", &self.download_prefix)
            .finish_non_exhaustive()
    }
}

impl BodyMutator {
    pub fn new(
        payload_cache: Arc<dyn PayloadCachePort>,
        large_files: Arc<dyn LargeFilePort>,
    ) -> Self {
        Self {
            payload_cache,
            large_files,
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
        }
    }

    /// Use another public prefix for download links
    #[must_use]
    pub fn with_download_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.download_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Generated text of `mb` megabytes, from cache when possible
    pub async fn large_payload(&self, mb: f64) -> Result<Arc<str>, SimulationError> {
        let size = payload_size(mb)?;
        if let Some(cached) = self.payload_cache.get(size).await {
            debug!(namespace = Namespace::BODY, size, "Large payload cache hit");
            return Ok(cached);
        }

        let payload = tokio::task::spawn_blocking(move || generate_payload(size))
            .await
            .map_err(|e| SimulationError::Internal(format!("payload generation failed: {e}")))?;
        self.payload_cache.insert(size, Arc::clone(&payload)).await;
        info!(namespace = Namespace::BODY, size, "Generated large payload");
        Ok(payload)
    }

    /// Make sure the file of `tier` exists and report where to get it
    pub async fn large_file(&self, tier: LargeFileTier) -> Result<Reply, SimulationError> {
        let (status, state) = if self.large_files.exists(tier).await? {
            (200, "exists")
        } else {
            info!(namespace = Namespace::BODY, %tier, "Creating large file");
            self.large_files.create(tier).await?;
            (201, "created")
        };

        Ok(Reply::json(
            status,
            &json!({
                "status": state,
                "tier": tier.label(),
                "sizeBytes": tier.size_bytes(),
                "download": format!("{}/{}", self.download_prefix, tier.label()),
            }),
        ))
    }
}

#[async_trait]
impl FaultSimulator for BodyMutator {
    type Settings = BodyMutationSettings;

    fn namespace(&self) -> &'static str {
        Namespace::BODY
    }

    async fn evaluate(
        &self,
        mut ctx: SimulatorContext<BodyMutationSettings>,
    ) -> Result<Step, SimulationError> {
        let settings = std::mem::take(&mut ctx.settings);

        if let Some(scheme) = settings.encoding_scheme.as_deref() {
            match scheme.parse::<Charset>() {
                Ok(charset) => {
                    info!(namespace = Namespace::BODY, %charset, "Overriding charset");
                    ctx.response_mut().charset = Some(charset);
                },
                Err(e) => warn!(namespace = Namespace::BODY, error = %e, "Ignoring encoding scheme"),
            }
        }

        if let Some(mb) = settings.large_payload_mb {
            let payload = self.large_payload(mb).await?;
            *ctx.body_mut() = Payload::Text(payload);
            ctx.response_mut().content_type = Some("text/plain".to_string());
        }

        if let Some(tier) = settings.large_file_size_tier {
            let reply = self.large_file(tier).await?;
            return Ok(ctx.respond(reply));
        }

        if settings.random_content_type {
            let content_type = random_content_type();
            info!(namespace = Namespace::BODY, content_type, "Forcing content type");
            ctx.response_mut().content_type = Some(content_type.to_string());
        }

        if settings.fake_compression {
            info!(namespace = Namespace::BODY, "Claiming gzip encoding");
            ctx.response_mut().headers.set("content-encoding", "gzip");
        }

        if settings.random_remove {
            match ctx.body_mut().as_json_mut() {
                Some(value) => {
                    let removed = remove_random(value, &mut rand::rng());
                    info!(namespace = Namespace::BODY, removed, "Randomly removed data");
                },
                None => debug!(namespace = Namespace::BODY, "Random removal skipped for text body"),
            }
        }

        Ok(ctx.proceed())
    }
}

/// Byte length of a large payload of `mb` megabytes
pub fn payload_size(mb: f64) -> Result<usize, SimulationError> {
    if !(MIN_PAYLOAD_MB..=MAX_PAYLOAD_MB).contains(&mb) {
        return Err(SimulationError::PayloadSize(format!(
            "payload size must be between {MIN_PAYLOAD_MB} and {MAX_PAYLOAD_MB} MB, got {mb}"
        )));
    }
    Ok((mb * BYTES_PER_MB).round() as usize)
}

fn generate_payload(size: usize) -> Arc<str> {
    let text: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(size)
        .map(char::from)
        .collect();
    Arc::from(text)
}

fn random_content_type() -> &'static str {
    MIME_CATALOG
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("text/plain")
}

/// Delete one random element of an array or one random key of an object
///
/// Returns whether something was removed.
pub fn remove_random<R: Rng + ?Sized>(value: &mut Value, rng: &mut R) -> bool {
    match value {
        Value::Array(items) if !items.is_empty() => {
            items.remove(rng.random_range(0..items.len()));
            true
        },
        Value::Object(map) if !map.is_empty() => {
            let index = rng.random_range(0..map.len());
            let key = map.keys().nth(index).cloned();
            key.is_some_and(|key| map.remove(&key).is_some())
        },
        _ => false,
    }
}
