//! Route definitions

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let server = state.config.server.clone();
    let download_route = format!(
        "/{}/{{tier}}",
        state.config.large_file.public_path.trim_matches('/')
    );

    let mut router = Router::new()
        .route("/healthcheck", get(handlers::health::health_check))
        .route("/api/v1/mock", post(handlers::mock::dispatch))
        .route(&download_route, get(handlers::largefile::download))
        .with_state(state)
        // Middleware: first added = innermost
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server.max_body_size_bytes));

    if let Some(secs) = server.request_timeout_secs {
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(secs),
        ));
    }
    if server.cors_enabled {
        router = router.layer(cors_layer(&server));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    }
}
