//! Upstream HTTP adapter
//!
//! Issues the outbound request of the `http` source with `reqwest`.
//! JSON is forced through the `Accept` header, the inbound request id is
//! propagated as `X-Request-Id`, and nothing is retried.

use application::{SimulationError, UpstreamPort, UpstreamRequest};
use async_trait::async_trait;
use domain::UpstreamMethod;
use reqwest::{Client, Method, header};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::UpstreamConfig;

/// Header name for request correlation ID
pub const X_REQUEST_ID: &str = "x-request-id";

/// `reqwest` implementation of [`UpstreamPort`]
#[derive(Debug, Clone)]
pub struct HttpUpstreamAdapter {
    client: Client,
}

impl HttpUpstreamAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }
}

const fn method(method: UpstreamMethod) -> Method {
    match method {
        UpstreamMethod::Get => Method::GET,
        UpstreamMethod::Post => Method::POST,
        UpstreamMethod::Put => Method::PUT,
        UpstreamMethod::Patch => Method::PATCH,
        UpstreamMethod::Delete => Method::DELETE,
    }
}

/// Query parameters as strings; non-string values use their JSON text
fn query_pairs(request: &UpstreamRequest) -> Vec<(&str, String)> {
    request
        .query
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), value)
        })
        .collect()
}

#[async_trait]
impl UpstreamPort for HttpUpstreamAdapter {
    #[instrument(skip(self, request), fields(uri = %request.uri, method = request.method.as_str()))]
    async fn fetch(&self, request: UpstreamRequest) -> Result<Value, SimulationError> {
        let mut builder = self
            .client
            .request(method(request.method), &request.uri)
            .header(header::ACCEPT, "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let query = query_pairs(&request);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(request_id) = &request.request_id {
            builder = builder.header(X_REQUEST_ID, request_id.as_str());
            debug!(request_id = %request_id, "Sending correlated HTTP request");
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Upstream request failed");
            SimulationError::upstream(&request.uri, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Upstream answered with an error status");
            return Err(SimulationError::upstream(
                &request.uri,
                format!("status {status}"),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SimulationError::upstream(&request.uri, format!("invalid JSON body: {e}")))
    }
}
