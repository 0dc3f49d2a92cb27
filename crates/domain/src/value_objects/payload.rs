//! Response payload value object

use std::sync::Arc;

use serde_json::Value;

/// The effective response body carried through the simulator pipeline
///
/// Most requests carry structured JSON. Generated payloads (large payload
/// simulation) are plain text and are shared rather than copied.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured JSON body
    Json(Value),
    /// Plain text body
    Text(Arc<str>),
}

impl Payload {
    /// Render the payload as the text that goes on the wire
    ///
    /// JSON is serialized compactly; text is returned as-is.
    pub fn render(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.to_string(),
        }
    }

    /// Mutable access to the JSON value, if this is a JSON payload
    pub fn as_json_mut(&mut self) -> Option<&mut Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Access the JSON value, if this is a JSON payload
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Whether this is a text payload
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::Json(Value::Null)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Arc<str>> for Payload {
    fn from(text: Arc<str>) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_renders_compact() {
        let payload = Payload::from(json!({"a": [1, 2]}));
        assert_eq!(payload.render(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn json_string_keeps_quotes() {
        let payload = Payload::from(json!("hello"));
        assert_eq!(payload.render(), "\"hello\"");
    }

    #[test]
    fn text_renders_verbatim() {
        let payload = Payload::Text(Arc::from("plain"));
        assert_eq!(payload.render(), "plain");
        assert!(payload.is_text());
        assert!(payload.as_json().is_none());
    }

    #[test]
    fn default_is_null() {
        assert_eq!(Payload::default(), Payload::Json(Value::Null));
    }
}
