//! Terminal handler writing the accumulated response

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use domain::{Charset, Namespace, Payload};
use mime::Mime;
use tracing::{debug, warn};

use super::{Exchange, Reply, Simulator, Step};
use crate::error::SimulationError;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
/// Bodies above this size are hashed for the ETag on the blocking pool
const INLINE_ETAG_LIMIT: usize = 256 * 1024;

/// Always the last registry entry; answers 200 with the effective body
///
/// Has no probability gate and reads no settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FinalHandler;

impl FinalHandler {
    /// Build the reply for a finished exchange
    pub fn finish(exchange: Exchange) -> Reply {
        let Exchange { body, response, .. } = exchange;

        let bytes = body_bytes(&body);
        let mut headers = response.headers;

        let content_type = response
            .content_type
            .unwrap_or_else(|| default_content_type(&body).to_string());
        let content_type = match response.charset {
            Some(charset) => with_charset(&content_type, charset),
            None => content_type,
        };
        headers.set("content-type", content_type);

        let length = response.content_length.unwrap_or(bytes.len() as u64);
        headers.set("content-length", length.to_string());

        if !headers.contains("etag") && bytes.len() <= INLINE_ETAG_LIMIT {
            headers.set("etag", weak_etag(&bytes));
        }

        Reply {
            status: 200,
            headers,
            body: bytes,
        }
    }
}

#[async_trait]
impl Simulator for FinalHandler {
    fn namespace(&self) -> &str {
        Namespace::FINAL_HANDLER
    }

    async fn ingest(&self, exchange: Exchange) -> Result<Step, SimulationError> {
        let mut reply = Self::finish(exchange);
        if !reply.headers.contains("etag") {
            let body = reply.body.clone();
            match tokio::task::spawn_blocking(move || weak_etag(&body)).await {
                Ok(etag) => reply.headers.set("etag", etag),
                Err(e) => warn!(error = %e, "ETag hashing failed, sending without"),
            }
        }
        debug!(bytes = reply.body.len(), "Writing final response");
        Ok(Step::Terminated(reply.into()))
    }
}

/// Wire bytes of the body; text payloads share their buffer
fn body_bytes(body: &Payload) -> Bytes {
    match body {
        Payload::Json(value) => Bytes::from(value.to_string()),
        Payload::Text(text) => Bytes::from_owner(SharedText(Arc::clone(text))),
    }
}

struct SharedText(Arc<str>);

impl AsRef<[u8]> for SharedText {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

const fn default_content_type(body: &Payload) -> &'static str {
    match body {
        Payload::Json(_) => JSON_CONTENT_TYPE,
        Payload::Text(_) => TEXT_CONTENT_TYPE,
    }
}

/// Replace the charset parameter of a content type, keeping the others
///
/// Content types that do not parse are left untouched.
pub fn with_charset(content_type: &str, charset: Charset) -> String {
    let Ok(parsed) = content_type.parse::<Mime>() else {
        warn!(content_type, "Cannot set charset on unparsable content type");
        return content_type.to_string();
    };

    let mut out = parsed.essence_str().to_string();
    for (name, value) in parsed.params() {
        if name != mime::CHARSET {
            out.push_str(&format!("; {name}={value}"));
        }
    }
    out.push_str("; charset=");
    out.push_str(charset.label());
    out
}

fn weak_etag(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes).to_hex();
    format!("W/\"{:x}-{}\"", bytes.len(), &hash[..27])
}
