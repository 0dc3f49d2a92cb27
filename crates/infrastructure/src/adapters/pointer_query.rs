//! Query evaluator over JSON Pointers and dotted paths
//!
//! Accepted forms:
//! - RFC 6901 pointers: `/users/0/name`
//! - dotted paths with bracket indices: `users[0].name`, optionally rooted
//!   at `$` (`$.users[0].name`)
//!
//! Both select one value; selecting nothing is an error.

use application::{QueryEvaluatorPort, SimulationError};
use serde_json::Value;
use tracing::debug;

/// Evaluates pointer and dotted-path queries with `serde_json`
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerQueryEvaluator;

impl PointerQueryEvaluator {
    pub const fn new() -> Self {
        Self
    }
}

impl QueryEvaluatorPort for PointerQueryEvaluator {
    fn evaluate(&self, query: &str, data: &Value) -> Result<Value, SimulationError> {
        let pointer = to_pointer(query).map_err(|reason| SimulationError::query(query, reason))?;
        debug!(query, pointer = %pointer, "Evaluating query");
        data.pointer(&pointer)
            .cloned()
            .ok_or_else(|| SimulationError::query(query, "query selected nothing"))
    }
}

/// Translate a query into a JSON Pointer
pub fn to_pointer(query: &str) -> Result<String, String> {
    let query = query.trim();
    if query.is_empty() || query.starts_with('/') {
        return Ok(query.to_string());
    }

    let path = query
        .strip_prefix('$')
        .map_or(query, |rest| rest.strip_prefix('.').unwrap_or(rest));
    if path.is_empty() {
        return Ok(String::new());
    }

    let mut pointer = String::new();
    for segment in path.split('.') {
        let (name, mut indices) = match segment.find('[') {
            Some(at) => segment.split_at(at),
            None => (segment, ""),
        };
        if name.is_empty() && indices.is_empty() {
            return Err("empty path segment".to_string());
        }
        if !name.is_empty() {
            push_token(&mut pointer, name);
        }
        while !indices.is_empty() {
            let Some(rest) = indices.strip_prefix('[') else {
                return Err(format!("unexpected text in '{segment}'"));
            };
            let Some(end) = rest.find(']') else {
                return Err(format!("unclosed bracket in '{segment}'"));
            };
            let index = &rest[..end];
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("index '{index}' is not a number"));
            }
            push_token(&mut pointer, index);
            indices = &rest[end + 1..];
        }
    }
    Ok(pointer)
}

fn push_token(pointer: &mut String, token: &str) {
    pointer.push('/');
    pointer.push_str(&token.replace('~', "~0").replace('/', "~1"));
}
