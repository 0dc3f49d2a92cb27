//! Logging and tracing setup
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` fed by
//! `RUST_LOG` or the configured filter, and a text or JSON formatter.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
