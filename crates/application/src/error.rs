//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors a pipeline layer can raise while handling one request
///
/// Every variant is recoverable per request: the engine turns it into a
/// JSON error response with [`SimulationError::status_code`].
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Malformed request or settings
    #[error("{0}")]
    Validation(String),

    /// Missing store key or missing file
    #[error("{0}")]
    NotFound(String),

    /// Proxied upstream could not be reached or answered with an error
    #[error("upstream {uri} is unreachable: {reason}")]
    Upstream { uri: String, reason: String },

    /// Query expression failed to evaluate
    #[error("query '{query}' failed: {reason}")]
    Query { query: String, reason: String },

    /// Requested payload size out of range
    #[error("{0}")]
    PayloadSize(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SimulationError {
    /// HTTP status the error is reported with
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Upstream { .. } | Self::Query { .. } => 400,
            Self::NotFound(_) => 404,
            Self::PayloadSize(_) => 413,
            Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable error code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Query { .. } => "QUERY_ERROR",
            Self::PayloadSize(_) => "PAYLOAD_SIZE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn upstream(uri: impl Into<String>, reason: impl ToString) -> Self {
        Self::Upstream {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    pub fn query(query: impl Into<String>, reason: impl ToString) -> Self {
        Self::Query {
            query: query.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<DomainError> for SimulationError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Errors raised while mutating the simulator registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Another entry already uses this namespace, or it is reserved
    #[error("Namespace '{0}' is already registered")]
    NamespaceTaken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(SimulationError::Validation("x".into()).status_code(), 400);
        assert_eq!(SimulationError::NotFound("x".into()).status_code(), 404);
        assert_eq!(SimulationError::upstream("http://a", "down").status_code(), 400);
        assert_eq!(SimulationError::query("/a", "no match").status_code(), 400);
        assert_eq!(SimulationError::PayloadSize("x".into()).status_code(), 413);
        assert_eq!(SimulationError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn upstream_message_names_uri() {
        let err = SimulationError::upstream("http://localhost:1/x", "connection refused");
        assert!(err.to_string().contains("http://localhost:1/x"));
    }

    #[test]
    fn query_message_contains_query_text() {
        let err = SimulationError::query("users[9].name", "selected nothing");
        assert!(err.to_string().contains("users[9].name"));
    }

    #[test]
    fn domain_errors_become_validation_errors() {
        let err: SimulationError = DomainError::MissingPayload.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn registry_error_names_namespace() {
        let err = RegistryError::NamespaceTaken("delay".into());
        assert_eq!(err.to_string(), "Namespace 'delay' is already registered");
    }
}
