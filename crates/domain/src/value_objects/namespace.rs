//! Simulator namespace value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Key under which a simulator's settings are scoped inside
/// `ExtendableSettings::simulators`.
///
/// Namespaces are case-sensitive and must be non-empty without whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Namespace of the terminal handler, always the last registry entry
    pub const FINAL_HANDLER: &'static str = "final-handler";
    /// Namespace of the source layer, always the first registry entry
    pub const SOURCE_LAYER: &'static str = "source-layer";

    pub const DELAY: &'static str = "delay";
    pub const CONNECTION: &'static str = "connection";
    pub const HEADER: &'static str = "header";
    pub const BODY: &'static str = "body";
    pub const COUNTER: &'static str = "counter";
    pub const REQUEST: &'static str = "request";

    /// Create a namespace, rejecting empty names and names with whitespace
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidNamespace(name));
        }
        Ok(Self(name))
    }

    /// Get the namespace as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the fixed sentinel entries of the registry
    pub fn is_reserved(&self) -> bool {
        self.0 == Self::FINAL_HANDLER || self.0 == Self::SOURCE_LAYER
    }
}

impl TryFrom<String> for Namespace {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
