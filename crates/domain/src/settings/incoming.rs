use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SourceDescriptor;
use crate::{errors::DomainError, value_objects::FailureProbability};

/// Settings shared by every layer of one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendableSettings {
    /// Probability gate input, see [`FailureProbability`]
    #[serde(default)]
    pub failure_probability: FailureProbability,

    /// Where the response body comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceDescriptor>,

    /// Per-simulator settings keyed by namespace
    #[serde(default)]
    pub simulators: BTreeMap<String, Value>,
}

impl ExtendableSettings {
    /// Settings slice of one namespace; an explicit `null` counts as absent
    pub fn slice(&self, namespace: &str) -> Option<&Value> {
        self.simulators.get(namespace).filter(|v| !v.is_null())
    }

    /// Validate the shared (non-simulator) part of the settings
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(source) = &self.source {
            source.validate()?;
        }
        Ok(())
    }
}

/// A decoded mock request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingData {
    /// Caller supplied body; `null` when omitted
    pub body: Value,
    /// Request settings; defaults when omitted
    pub settings: ExtendableSettings,
}

impl IncomingData {
    /// Decode the raw request JSON
    ///
    /// At least one of `body` and `settings` must be present.
    pub fn parse(raw: Value) -> Result<Self, DomainError> {
        let Value::Object(mut map) = raw else {
            return Err(DomainError::MissingPayload);
        };

        let body = map.remove("body");
        let settings = map.remove("settings");
        if body.is_none() && settings.is_none() {
            return Err(DomainError::MissingPayload);
        }

        let settings = match settings {
            None | Some(Value::Null) => ExtendableSettings::default(),
            Some(value) => serde_json::from_value::<ExtendableSettings>(value)
                .map_err(|e| DomainError::invalid_settings("settings", e))?,
        };
        settings.validate()?;

        Ok(Self {
            body: body.unwrap_or(Value::Null),
            settings,
        })
    }

    /// Convenience constructor for a raw `{ body, settings }` object
    pub fn from_parts(body: Value, settings: Value) -> Result<Self, DomainError> {
        let mut map = Map::new();
        map.insert("body".to_string(), body);
        map.insert("settings".to_string(), settings);
        Self::parse(Value::Object(map))
    }
}
