//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// The incoming request carried neither `body` nor `settings`
    #[error("Request must contain a body or settings")]
    MissingPayload,

    /// A settings value could not be decoded
    #[error("Invalid settings for '{namespace}': {reason}")]
    InvalidSettings { namespace: String, reason: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Invalid namespace name
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Unsupported charset requested
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// Unknown large file tier
    #[error("Unknown file size tier: {0}")]
    UnknownFileTier(String),
}

impl DomainError {
    /// Create an invalid settings error for a namespace
    pub fn invalid_settings(namespace: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidSettings {
            namespace: namespace.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_settings_creates_correct_error() {
        let err = DomainError::invalid_settings("delay", "missing field `delay`");
        match err {
            DomainError::InvalidSettings { namespace, reason } => {
                assert_eq!(namespace, "delay");
                assert_eq!(reason, "missing field `delay`");
            },
            _ => unreachable!("Expected InvalidSettings error"),
        }
    }

    #[test]
    fn invalid_settings_error_message_is_correct() {
        let err = DomainError::invalid_settings("body", "expected a boolean");
        assert_eq!(
            err.to_string(),
            "Invalid settings for 'body': expected a boolean"
        );
    }

    #[test]
    fn missing_payload_error_message() {
        assert_eq!(
            DomainError::MissingPayload.to_string(),
            "Request must contain a body or settings"
        );
    }

    #[test]
    fn unknown_tier_error_message() {
        let err = DomainError::UnknownFileTier("7gb".to_string());
        assert_eq!(err.to_string(), "Unknown file size tier: 7gb");
    }
}
