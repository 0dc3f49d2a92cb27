//! Request ID middleware for HTTP request correlation
//!
//! Keeps the client's `X-Request-Id` or generates a UUID v7, writes it
//! back into the request headers so the pipeline can forward it
//! upstream, and opens a span carrying it.

use axum::{body::Body, extract::Request, http::header::HeaderValue, response::Response};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

use application::REQUEST_ID_HEADER;

/// Longest client supplied id that is kept
const MAX_CLIENT_ID_LEN: usize = 128;

/// Layer that adds request ID handling to HTTP services
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Create a new request ID layer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that extracts or generates a request ID for each request
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let request_id = RequestId::from_header(request.headers().get(REQUEST_ID_HEADER));

        if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
            request.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        request.extensions_mut().insert(request_id.clone());

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            uri = %request.uri().path(),
        );

        // Take the service that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let mut response = inner.call(request).await?;

                if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Request ID taken from the request headers or generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Fresh UUID v7 id
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Keep a usable client id, otherwise generate one
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= MAX_CLIENT_ID_LEN)
            .map_or_else(Self::generate, |s| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_layer_new() {
        let layer = RequestIdLayer::new();
        assert!(std::mem::size_of_val(&layer) == 0); // Zero-sized type
    }

    #[test]
    fn client_id_is_kept() {
        let value = HeaderValue::from_static("trace-123");
        assert_eq!(RequestId::from_header(Some(&value)).as_str(), "trace-123");
    }

    #[test]
    fn missing_id_is_generated_as_uuid_v7() {
        let id = RequestId::from_header(None);
        let uuid = Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(uuid.get_version_num(), 7);
    }

    #[test]
    fn oversized_or_blank_ids_are_replaced() {
        let blank = HeaderValue::from_static("   ");
        assert!(Uuid::parse_str(RequestId::from_header(Some(&blank)).as_str()).is_ok());

        let long = HeaderValue::from_str(&"x".repeat(MAX_CLIENT_ID_LEN + 1)).unwrap();
        assert!(Uuid::parse_str(RequestId::from_header(Some(&long)).as_str()).is_ok());
    }

    #[test]
    fn request_id_display() {
        let id = RequestId("abc".to_string());
        assert_eq!(id.to_string(), "abc");
    }
}
