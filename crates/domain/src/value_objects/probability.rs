//! Probability gate value objects

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// The `failureProbability` value of a request, guaranteed to lie in `[0, 1]`
///
/// `1.0` lets every request pass untouched, `0.0` selects the fault on
/// every request.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FailureProbability(f64);

impl FailureProbability {
    /// Always select the fault
    pub const ALWAYS_FAIL: Self = Self(0.0);
    /// Never select the fault
    pub const NEVER_FAIL: Self = Self(1.0);

    /// Create a probability, rejecting values outside `[0, 1]` and NaN
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::ValidationError(format!(
                "failureProbability must be between 0 and 1, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Get the raw value
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Run one Bernoulli trial against this probability with a
    /// caller-supplied uniform sample from `[0, 1)`
    pub fn check(self, random: f64) -> ProbabilityResult {
        ProbabilityResult {
            random,
            passed: random < self.0,
        }
    }
}

impl TryFrom<f64> for FailureProbability {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FailureProbability> for f64 {
    fn from(value: FailureProbability) -> Self {
        value.0
    }
}

impl fmt::Display for FailureProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one probability check
///
/// `passed == false` means the fault was selected for injection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    /// The uniform sample the decision was based on
    pub random: f64,
    /// Whether the request passes through without a fault
    pub passed: bool,
}

impl ProbabilityResult {
    /// Whether the fault was selected
    pub const fn fault_selected(&self) -> bool {
        !self.passed
    }
}
