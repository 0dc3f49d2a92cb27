use serde::{Deserialize, Serialize};
use validator::Validate;

use super::check;
use crate::errors::DomainError;

/// Settings slice of the request counter; carries no options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSettings {}

/// When URL verification fails the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    /// Fail if the request URL equals the configured URL
    Same,
    /// Fail if the request URL differs from the configured URL
    Different,
}

/// URL verification rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UrlVerification {
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: String,
    pub fail_on: FailOn,
}

/// Settings slice of the request verification simulator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestVerificationSettings {
    #[serde(default)]
    #[validate(nested)]
    pub verify_url: Option<UrlVerification>,
}

impl RequestVerificationSettings {
    pub fn validate_slice(&self) -> Result<(), DomainError> {
        check("request", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counter_settings_accept_empty_object() {
        assert!(serde_json::from_value::<CounterSettings>(json!({})).is_ok());
    }

    #[test]
    fn parses_verify_url() {
        let s: RequestVerificationSettings = serde_json::from_value(json!({
            "verifyUrl": {"url": "/api/v1/mock", "failOn": "different"}
        }))
        .unwrap();
        let rule = s.verify_url.as_ref().unwrap();
        assert_eq!(rule.fail_on, FailOn::Different);
        assert!(s.validate_slice().is_ok());
    }

    #[test]
    fn empty_url_is_invalid() {
        let s = RequestVerificationSettings {
            verify_url: Some(UrlVerification {
                url: String::new(),
                fail_on: FailOn::Same,
            }),
        };
        assert!(s.validate_slice().is_err());
    }
}
