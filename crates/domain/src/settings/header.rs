use serde::{Deserialize, Serialize};
use validator::Validate;

use super::check;
use crate::errors::DomainError;

/// A header name/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HeaderPair {
    #[validate(length(min = 1, message = "header name must not be empty"))]
    pub key: String,
    pub value: String,
}

/// Settings slice of the header mutator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HeaderMutationSettings {
    /// Headers to set verbatim
    #[serde(default)]
    #[validate(nested)]
    pub extra_headers: Vec<HeaderPair>,

    /// Add one header with a random name and value
    #[serde(default)]
    pub inject_random: bool,

    /// Announce a `Content-Length` unrelated to the body
    #[serde(default)]
    pub incorrect_content_length: bool,

    /// Declared extension point, logged as not implemented
    #[serde(default)]
    pub duplicate_header: bool,

    /// Declared extension point, logged as not implemented
    #[serde(default)]
    pub permutate: bool,
}

impl HeaderMutationSettings {
    pub fn validate_slice(&self) -> Result<(), DomainError> {
        check("header", self)
    }
}
