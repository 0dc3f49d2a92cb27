//! Mock dispatch handler

use application::{Headers, RequestMeta};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
};
use serde_json::Value;
use tracing::debug;

use crate::{error::ApiError, response::into_response, state::AppState};

/// Run the request through the simulator pipeline
///
/// The body must be a JSON document of the form
/// `{ "body": ..., "settings": { ... } }`.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let request = RequestMeta::new(method.as_str(), uri.to_string(), request_headers(&headers));
    let simulated = state.engine.dispatch(raw, request).await;
    debug!(status = ?simulated.status(), "Pipeline finished");

    Ok(into_response(simulated))
}

/// Inbound headers with textual values
fn request_headers(headers: &HeaderMap) -> Headers {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn request_headers_skip_opaque_values() {
        let mut map = HeaderMap::new();
        map.insert("x-faultbird-id", HeaderValue::from_static("client-a"));
        map.insert("x-binary", HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap());

        let headers = request_headers(&map);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Faultbird-Id"), Some("client-a"));
    }
}
