//! Health check handler

use axum::Json;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub health: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        health: "OK".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_ok() {
        let Json(response) = health_check().await;
        assert_eq!(response.health, "OK");
    }

    #[test]
    fn health_response_serializes() {
        let json = serde_json::to_value(HealthResponse {
            health: "OK".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "health": "OK" }));
    }
}
