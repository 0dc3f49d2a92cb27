//! Domain layer for faultbird
//!
//! Contains the settings model every fault simulator reads, the value
//! objects shared across layers, and domain errors.
//! This layer has no I/O and defines the ubiquitous language.

pub mod errors;
pub mod settings;
pub mod value_objects;

pub use errors::DomainError;
pub use settings::*;
pub use value_objects::*;
