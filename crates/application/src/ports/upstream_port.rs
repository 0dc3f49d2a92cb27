//! Upstream HTTP port definition

use std::collections::BTreeMap;

use async_trait::async_trait;
use domain::{ProxySettings, UpstreamMethod};
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::SimulationError;

/// One outbound request issued by the `http` source
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub uri: String,
    pub method: UpstreamMethod,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, Value>,
    pub body: Option<Value>,
    /// Request id of the inbound request, forwarded for correlation
    pub request_id: Option<String>,
}

impl UpstreamRequest {
    pub fn from_settings(settings: &ProxySettings, request_id: Option<String>) -> Self {
        Self {
            uri: settings.uri.clone(),
            method: settings.method,
            headers: settings.headers.clone(),
            query: settings.qs.clone(),
            body: settings.body.clone(),
            request_id,
        }
    }
}

/// Outbound HTTP client used to proxy an upstream JSON resource
///
/// Implementations force JSON, never retry, and map network failures,
/// non-2xx statuses and undecodable bodies to
/// [`SimulationError::Upstream`] naming the URI.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UpstreamPort: Send + Sync {
    async fn fetch(&self, request: UpstreamRequest) -> Result<Value, SimulationError>;
}
