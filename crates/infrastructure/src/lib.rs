//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer and owns
//! configuration loading and logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use cache::MokaPayloadCache;
pub use config::{
    AppConfig, Environment, LargeFileConfig, PayloadCacheConfig, ServerConfig, SimulatorsConfig,
    StoreConfig, UpstreamConfig,
};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
