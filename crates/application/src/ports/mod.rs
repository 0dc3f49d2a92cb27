//! Port definitions for application layer
//!
//! Ports are interfaces that define how the pipeline reaches external
//! systems. Adapters in the infrastructure layer implement these ports.

mod data_store_port;
mod large_file_port;
mod payload_cache_port;
mod query_evaluator_port;
mod upstream_port;

pub use data_store_port::DataStorePort;
#[cfg(test)]
pub use data_store_port::MockDataStorePort;
pub use large_file_port::LargeFilePort;
#[cfg(test)]
pub use large_file_port::MockLargeFilePort;
#[cfg(test)]
pub use payload_cache_port::MockPayloadCachePort;
pub use payload_cache_port::PayloadCachePort;
#[cfg(test)]
pub use query_evaluator_port::MockQueryEvaluatorPort;
pub use query_evaluator_port::QueryEvaluatorPort;
#[cfg(test)]
pub use upstream_port::MockUpstreamPort;
pub use upstream_port::{UpstreamPort, UpstreamRequest};
