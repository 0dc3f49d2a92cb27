//! Simulator selection.

use serde::{Deserialize, Serialize};

/// Which built-in simulators are loaded at startup, in pipeline order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,
}

fn default_enabled() -> Vec<String> {
    ["delay", "connection", "header", "body", "counter", "request"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for SimulatorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}
