//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `sources`: data store and upstream HTTP client
//! - `generation`: large file directory and large payload cache
//! - `simulators`: which simulators are loaded
//!
//! Sources are layered: built-in defaults, then an optional
//! `faultbird.toml` / `config.toml`, then `FAULTBIRD_*` environment
//! variables where `__` separates nested keys
//! (`FAULTBIRD_SERVER__PORT=8080`).

mod generation;
mod server;
mod simulators;
mod sources;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use generation::{LargeFileConfig, PayloadCacheConfig};
pub use server::ServerConfig;
pub use simulators::SimulatorsConfig;
pub use sources::{StoreConfig, UpstreamConfig};

use crate::telemetry::TelemetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FAULTBIRD";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Data store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Upstream HTTP client configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Large file configuration
    #[serde(default)]
    pub large_file: LargeFileConfig,

    /// Large payload cache configuration
    #[serde(default)]
    pub payload_cache: PayloadCacheConfig,

    /// Simulator selection
    #[serde(default)]
    pub simulators: SimulatorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from the working directory and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name("faultbird").required(false))
            .add_source(config::File::with_name("config").required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an explicit file plus the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)
    }

    fn environment() -> config::Environment {
        // e.g. FAULTBIRD_SERVER__PORT, FAULTBIRD_SIMULATORS__ENABLED=delay,body
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("simulators.enabled")
            .with_list_parse_key("server.allowed_origins")
            .try_parsing(true)
    }

    /// Effective environment, development when unset
    pub fn environment_or_default(&self) -> Environment {
        self.environment.unwrap_or_default()
    }
}
