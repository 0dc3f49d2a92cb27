//! Built-in fault simulators
//!
//! Each simulator is a [`FaultSimulator`](crate::pipeline::FaultSimulator)
//! strategy; wrap it in [`Gated`](crate::pipeline::Gated) to load it into
//! the engine.

mod body;
mod connection;
mod counter;
mod delay;
mod header;
mod request;

pub use body::{
    BodyMutator, DEFAULT_DOWNLOAD_PREFIX, MAX_PAYLOAD_MB, MIME_CATALOG, MIN_PAYLOAD_MB,
    payload_size, remove_random,
};
pub use connection::ConnectionSimulator;
pub use counter::{CLIENT_ID_HEADER, REQUEST_COUNT_HEADER, RequestCounter};
pub use delay::DelaySimulator;
pub use header::{HeaderMutator, random_header};
pub use request::RequestVerifier;
