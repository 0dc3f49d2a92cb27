//! Application state shared across handlers

use std::{fmt, sync::Arc};

use anyhow::{Context, bail};
use application::{
    BodyMutator, ConnectionSimulator, DataStorePort, DelaySimulator, Gated, HeaderMutator,
    LargeFilePort, MockEngine, PayloadCachePort, RequestCounter, RequestVerifier, Simulator,
    SourceLayer,
};
use domain::Namespace;
use infrastructure::{
    AppConfig, BlockFillFileStore, HttpUpstreamAdapter, JsonFileStore, MokaPayloadCache,
    PointerQueryEvaluator,
};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Simulator pipeline
    pub engine: Arc<MockEngine>,
    /// Generated large files served for download
    pub large_files: Arc<dyn LargeFilePort>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire adapters, source layer and the enabled simulators
    ///
    /// Fails on an unreadable store file, an unknown simulator name or a
    /// namespace enabled twice.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn DataStorePort> = match &config.store.path {
            Some(path) => Arc::new(
                JsonFileStore::load(path)
                    .await
                    .with_context(|| format!("Failed to load store {}", path.display()))?,
            ),
            None => Arc::new(JsonFileStore::empty()),
        };
        let upstream = HttpUpstreamAdapter::new(&config.upstream)
            .context("Failed to build upstream HTTP client")?;
        let source = SourceLayer::new(store, Arc::new(PointerQueryEvaluator), Arc::new(upstream));

        let large_files: Arc<dyn LargeFilePort> =
            Arc::new(BlockFillFileStore::new(config.large_file.directory.clone()));
        let payload_cache: Arc<dyn PayloadCachePort> =
            Arc::new(MokaPayloadCache::with_config(config.payload_cache.clone()));
        let body = BodyMutator::new(payload_cache, Arc::clone(&large_files))
            .with_download_prefix(config.large_file.public_path.clone());

        let mut simulators = Vec::with_capacity(config.simulators.enabled.len());
        for name in &config.simulators.enabled {
            simulators.push(builtin_simulator(name, &body)?);
        }

        let engine = Arc::new(MockEngine::new(Arc::new(source)));
        engine
            .load_all(simulators)
            .context("Failed to register simulators")?;
        info!(namespaces = ?engine.namespaces(), "Simulators loaded");

        Ok(Self {
            engine,
            large_files,
            config: Arc::new(config),
        })
    }
}

/// Built-in simulator registered under `name`
fn builtin_simulator(name: &str, body: &BodyMutator) -> anyhow::Result<Arc<dyn Simulator>> {
    let simulator: Arc<dyn Simulator> = match name {
        Namespace::DELAY => Arc::new(Gated::new(DelaySimulator)),
        Namespace::CONNECTION => Arc::new(Gated::new(ConnectionSimulator)),
        Namespace::HEADER => Arc::new(Gated::new(HeaderMutator)),
        Namespace::BODY => Arc::new(Gated::new(body.clone())),
        Namespace::COUNTER => Arc::new(Gated::new(RequestCounter::new())),
        Namespace::REQUEST => Arc::new(Gated::new(RequestVerifier)),
        other => bail!("Unknown simulator '{other}'"),
    };
    Ok(simulator)
}
