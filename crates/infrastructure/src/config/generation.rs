//! Large file and large payload configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where generated large files live and how they are linked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFileConfig {
    /// Directory holding `large-<tier>.bin` files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Public path prefix of download links
    #[serde(default = "default_public_path")]
    pub public_path: String,
}

fn default_directory() -> PathBuf {
    std::env::temp_dir().join("faultbird")
}

fn default_public_path() -> String {
    "/api/v1/mock/largefile".to_string()
}

impl Default for LargeFileConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            public_path: default_public_path(),
        }
    }
}

/// Cache of generated large payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadCacheConfig {
    /// Maximum cached bytes in megabytes
    #[serde(default = "default_max_capacity_mb")]
    pub max_capacity_mb: u64,

    /// Time to live of a cached payload in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

const fn default_max_capacity_mb() -> u64 {
    256
}

const fn default_ttl() -> u64 {
    3600
}

impl Default for PayloadCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity_mb: default_max_capacity_mb(),
            ttl_secs: default_ttl(),
        }
    }
}

impl PayloadCacheConfig {
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
