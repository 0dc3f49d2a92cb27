//! Simulator pipeline
//!
//! The contract every layer satisfies, the per-request exchange, the
//! responses a request can end in, and the engine that runs them.

mod dribble;
mod engine;
mod exchange;
mod final_handler;
mod headers;
mod response;
mod simulator;

pub use dribble::{ChunkSink, DribbleOutcome, DribblePlan, SinkClosed};
pub use engine::{MockEngine, SimulatorHandle};
pub use exchange::{Exchange, REQUEST_ID_HEADER, RequestMeta, ResponseDraft};
pub use final_handler::{FinalHandler, with_charset};
pub use headers::Headers;
pub use response::{Reply, SimulatedResponse};
pub use simulator::{FaultSimulator, Gated, Simulator, SimulatorContext, Step};
