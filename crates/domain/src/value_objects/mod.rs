//! Value objects - Immutable, identity-less domain primitives

mod charset;
mod file_tier;
mod namespace;
mod payload;
mod probability;

pub use charset::Charset;
pub use file_tier::LargeFileTier;
pub use namespace::Namespace;
pub use payload::Payload;
pub use probability::{FailureProbability, ProbabilityResult};
