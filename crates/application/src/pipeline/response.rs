//! Responses produced by the pipeline

use bytes::Bytes;
use serde_json::{Value, json};

use super::{DribblePlan, Headers};
use crate::error::SimulationError;

/// A complete response with status, headers and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Reply {
    /// JSON reply with `Content-Type: application/json`
    pub fn json(status: u16, value: &Value) -> Self {
        let mut headers = Headers::new();
        headers.set("content-type", "application/json; charset=utf-8");
        Self {
            status,
            headers,
            body: Bytes::from(value.to_string()),
        }
    }

    /// Reply without a body
    pub fn empty(status: u16) -> Self {
        let mut headers = Headers::new();
        headers.set("content-length", "0");
        Self {
            status,
            headers,
            body: Bytes::new(),
        }
    }

    /// `{ "error": message }` with the status of the error
    pub fn error(err: &SimulationError) -> Self {
        Self::json(err.status_code(), &json!({ "error": err.to_string() }))
    }
}

/// How the transport must answer a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedResponse {
    /// Send a complete response
    Reply(Reply),
    /// Stream the body according to a dribble schedule
    Dribble { headers: Headers, plan: DribblePlan },
    /// Abort the connection without a complete response
    ResetConnection,
}

impl SimulatedResponse {
    /// Status line of the response, if one is sent at all
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Reply(reply) => Some(reply.status),
            Self::Dribble { .. } => Some(200),
            Self::ResetConnection => None,
        }
    }
}

impl From<Reply> for SimulatedResponse {
    fn from(reply: Reply) -> Self {
        Self::Reply(reply)
    }
}
