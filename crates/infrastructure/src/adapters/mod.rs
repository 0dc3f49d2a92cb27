//! Adapters implementing application ports

mod block_fill_file_store;
mod http_upstream_adapter;
mod json_file_store;
mod pointer_query;

pub use block_fill_file_store::BlockFillFileStore;
pub use http_upstream_adapter::{HttpUpstreamAdapter, X_REQUEST_ID};
pub use json_file_store::{JsonFileStore, StoreError};
pub use pointer_query::{PointerQueryEvaluator, to_pointer};
