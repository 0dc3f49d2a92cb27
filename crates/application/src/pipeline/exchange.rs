//! Per-request state flowing through the pipeline

use std::sync::Arc;

use domain::{Charset, ExtendableSettings, IncomingData, Payload};

use super::Headers;

/// Name of the request id header propagated to upstream calls
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// What the pipeline knows about the inbound HTTP request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub method: String,
    /// Path and query as received
    pub uri: String,
    pub headers: Headers,
}

impl RequestMeta {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, headers: Headers) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(REQUEST_ID_HEADER)
    }
}

/// Response state accumulated by the layers and written by the terminal
/// handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDraft {
    pub headers: Headers,
    /// Content type forced by a layer instead of the payload default
    pub content_type: Option<String>,
    /// Charset written into the content type
    pub charset: Option<Charset>,
    /// Spoofed `Content-Length`
    pub content_length: Option<u64>,
}

/// One request on its way through the pipeline
///
/// Owned by exactly one request; layers take it by value and hand it on.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Effective response body, replaceable by any layer
    pub body: Payload,
    pub settings: Arc<ExtendableSettings>,
    pub request: Arc<RequestMeta>,
    pub response: ResponseDraft,
}

impl Exchange {
    pub fn new(data: IncomingData, request: RequestMeta) -> Self {
        Self {
            body: Payload::Json(data.body),
            settings: Arc::new(data.settings),
            request: Arc::new(request),
            response: ResponseDraft::default(),
        }
    }
}
