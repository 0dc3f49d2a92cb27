//! Application layer - simulator pipeline
//!
//! Contains the simulator contract, the pipeline engine, the built-in
//! fault simulators, the source layer and the port definitions adapters
//! implement.

pub mod error;
pub mod pipeline;
pub mod ports;
pub mod simulators;
pub mod source_layer;

pub use error::{RegistryError, SimulationError};
pub use pipeline::*;
pub use ports::*;
pub use simulators::*;
pub use source_layer::SourceLayer;
