use serde::{Deserialize, Serialize};

/// Settings slice of the connection fault simulator, a bare string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionFaultDescriptor {
    /// Answer 200 with an empty body
    EmptyResponse,
    /// Drop the connection without a complete response
    #[serde(rename = "connection_reset_by_peer", alias = "reset_by_peer")]
    ResetByPeer,
}
