//! Large file download handler

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderValue, header},
    response::Response,
};
use domain::LargeFileTier;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{info, instrument};

use crate::{error::ApiError, state::AppState};

/// Serve a previously generated large file as an attachment
#[instrument(skip(state, request))]
pub async fn download(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let tier: LargeFileTier = tier.parse()?;
    if !state.large_files.exists(tier).await? {
        return Err(ApiError::NotFound(format!(
            "{} has not been generated",
            tier.file_name()
        )));
    }

    let path = state.large_files.path(tier);
    info!(path = %path.display(), "Serving large file");

    let response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to serve {}: {e}", path.display())))?;
    let mut response = response.map(Body::new);

    let disposition = format!("attachment; filename=\"{}\"", tier.file_name());
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}
