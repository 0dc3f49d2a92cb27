use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Settings slice of the delay simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelayDescriptor {
    /// Hold the response for exactly `delay` milliseconds
    Fixed { delay: u64 },

    /// Hold the response for a uniform random duration in `[from, to]` ms
    Random { from: u64, to: u64 },

    /// Stream the body in `number_of_chunks` slices spread over `duration_ms`
    #[serde(rename_all = "camelCase")]
    ChunkedDribble {
        number_of_chunks: usize,
        #[serde(alias = "duration")]
        duration_ms: u64,
    },

    /// Declared extension point with no executing branch
    Lognormal { median: f64, sigma: f64 },

    /// Declared extension point with no executing branch
    Uniform { lower: f64, upper: f64 },
}

impl DelayDescriptor {
    /// Short name used in logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::Random { .. } => "random",
            Self::ChunkedDribble { .. } => "chunked_dribble",
            Self::Lognormal { .. } => "lognormal",
            Self::Uniform { .. } => "uniform",
        }
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<(), DomainError> {
        match *self {
            Self::Random { from, to } if from > to => Err(DomainError::invalid_settings(
                "delay",
                format!("random delay range is empty: from {from} > to {to}"),
            )),
            Self::ChunkedDribble {
                number_of_chunks: 0,
                ..
            } => Err(DomainError::invalid_settings(
                "delay",
                "numberOfChunks must be at least 1",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_fixed() {
        let d: DelayDescriptor = serde_json::from_value(json!({"type": "fixed", "delay": 250})).unwrap();
        assert_eq!(d, DelayDescriptor::Fixed { delay: 250 });
    }

    #[test]
    fn parses_chunked_dribble_with_either_duration_key() {
        let a: DelayDescriptor = serde_json::from_value(json!({
            "type": "chunked_dribble", "numberOfChunks": 5, "durationMs": 1000
        }))
        .unwrap();
        let b: DelayDescriptor = serde_json::from_value(json!({
            "type": "chunked_dribble", "numberOfChunks": 5, "duration": 1000
        }))
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.kind(), "chunked_dribble");
    }

    #[test]
    fn parses_declared_only_variants() {
        let d: DelayDescriptor =
            serde_json::from_value(json!({"type": "lognormal", "median": 90.0, "sigma": 0.1}))
                .unwrap();
        assert_eq!(d.kind(), "lognormal");
    }

    #[test]
    fn zero_chunks_is_invalid() {
        let d = DelayDescriptor::ChunkedDribble {
            number_of_chunks: 0,
            duration_ms: 100,
        };
        assert!(d.validate().is_err());
    }

    #[test]
    fn inverted_random_range_is_invalid() {
        assert!(DelayDescriptor::Random { from: 10, to: 5 }.validate().is_err());
        assert!(DelayDescriptor::Random { from: 5, to: 5 }.validate().is_ok());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_value::<DelayDescriptor>(json!({"type": "pareto"})).is_err());
    }
}
