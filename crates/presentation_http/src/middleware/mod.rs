//! HTTP middleware components

pub mod request_id;

pub use request_id::{RequestId, RequestIdLayer};
