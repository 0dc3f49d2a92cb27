//! Caching infrastructure

mod moka_payload_cache;

pub use moka_payload_cache::MokaPayloadCache;
