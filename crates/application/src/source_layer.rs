//! Source layer
//!
//! First entry of every pipeline. Resolves the effective response body
//! from `settings.source` before any fault simulator runs: the caller's
//! body, a data store entry (optionally narrowed by a query), or an
//! upstream HTTP resource. Not gated by the failure probability.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{Namespace, Payload, ProxySettings, SourceDescriptor, StoreSettings};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::SimulationError;
use crate::pipeline::{Exchange, Simulator, Step};
use crate::ports::{DataStorePort, QueryEvaluatorPort, UpstreamPort, UpstreamRequest};

/// Resolves the response body from the configured source
pub struct SourceLayer {
    store: Arc<dyn DataStorePort>,
    query: Arc<dyn QueryEvaluatorPort>,
    upstream: Arc<dyn UpstreamPort>,
}

impl fmt::Debug for SourceLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceLayer").finish_non_exhaustive()
    }
}

impl SourceLayer {
    pub fn new(
        store: Arc<dyn DataStorePort>,
        query: Arc<dyn QueryEvaluatorPort>,
        upstream: Arc<dyn UpstreamPort>,
    ) -> Self {
        Self {
            store,
            query,
            upstream,
        }
    }

    /// Stored value of `storeKey`, narrowed by `query` when present
    pub async fn from_store(&self, settings: &StoreSettings) -> Result<Value, SimulationError> {
        let key = settings.store_key.as_str();
        let Some(stored) = self.store.get(key).await? else {
            return Err(SimulationError::NotFound(format!(
                "{key} store key not found"
            )));
        };

        let Some(query) = settings.query.as_deref() else {
            debug!(store_key = key, "Serving stored value");
            return Ok(stored);
        };

        let mut scope = Map::new();
        scope.insert(key.to_string(), stored);
        let selected = self.query.evaluate(query, &Value::Object(scope))?;
        debug!(store_key = key, query, "Serving query result");
        Ok(selected)
    }

    /// Body of the upstream resource
    pub async fn from_upstream(
        &self,
        settings: &ProxySettings,
        request_id: Option<String>,
    ) -> Result<Value, SimulationError> {
        info!(uri = %settings.uri, method = settings.method.as_str(), "Proxying upstream");
        self.upstream
            .fetch(UpstreamRequest::from_settings(settings, request_id))
            .await
    }
}

#[async_trait]
impl Simulator for SourceLayer {
    fn namespace(&self) -> &str {
        Namespace::SOURCE_LAYER
    }

    async fn ingest(&self, mut exchange: Exchange) -> Result<Step, SimulationError> {
        let settings = Arc::clone(&exchange.settings);
        let body = match &settings.source {
            None | Some(SourceDescriptor::Body) => return Ok(Step::Continue(exchange)),
            Some(SourceDescriptor::Store(store)) => self.from_store(store).await?,
            Some(SourceDescriptor::Http(proxy)) => {
                let request_id = exchange.request.request_id().map(str::to_string);
                self.from_upstream(proxy, request_id).await?
            },
        };
        exchange.body = Payload::Json(body);
        Ok(Step::Continue(exchange))
    }
}
