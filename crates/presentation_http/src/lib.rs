//! Faultbird HTTP presentation layer
//!
//! Thin axum transport in front of the simulator pipeline.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{RequestId, RequestIdLayer};
pub use routes::create_router;
pub use state::AppState;
