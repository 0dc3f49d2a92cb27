use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::check;
use crate::errors::DomainError;

/// Where the response body comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "settings", rename_all = "lowercase")]
pub enum SourceDescriptor {
    /// Use the caller supplied body unchanged
    Body,
    /// Look the body up in the data store
    Store(StoreSettings),
    /// Fetch the body from an upstream HTTP service
    Http(ProxySettings),
}

impl SourceDescriptor {
    /// Short name used in logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Store(_) => "store",
            Self::Http(_) => "http",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Body => Ok(()),
            Self::Store(settings) => check("source", settings),
            Self::Http(settings) => check("source", settings),
        }
    }
}

/// Data store lookup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Key of the stored value
    #[validate(length(min = 1, message = "storeKey must not be empty"))]
    pub store_key: String,
    /// Optional query evaluated against `{ storeKey: value }`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// HTTP methods accepted for upstream requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpstreamMethod {
    #[default]
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "delete")]
    Delete,
}

impl UpstreamMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Upstream HTTP source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    /// Absolute URI of the upstream resource
    #[validate(url(message = "uri must be an absolute URL"))]
    pub uri: String,
    #[serde(default)]
    pub method: UpstreamMethod,
    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Query string parameters
    #[serde(default, alias = "queryString")]
    pub qs: BTreeMap<String, Value>,
    /// Optional JSON request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}
