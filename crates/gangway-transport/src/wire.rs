//! Partially-typed wire values
//!
//! The host protocol hands us dynamic values where a field can be a concrete
//! value, an explicit null, or "unknown" (to be computed after a remote
//! operation). JSON has null but no unknown, so the JSON mapping encodes
//! unknown as the sentinel object `{"$unknown": true}`. The transport schema
//! only carries string-typed leaves, so the sentinel cannot collide with
//! real data. Numbers travel as `f64`; a non-finite number has no JSON form
//! and maps to null in both directions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// JSON object key marking an unknown value.
pub const UNKNOWN_KEY: &str = "$unknown";

/// A dynamic tri-state wire value.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Value will be determined after a remote operation.
    Unknown,
    /// Explicitly absent.
    Null,
    String(String),
    Bool(bool),
    Number(f64),
    List(Vec<WireValue>),
    Object(BTreeMap<String, WireValue>),
}

impl WireValue {
    /// True when the value is neither Null nor Unknown.
    pub fn is_known(&self) -> bool {
        !matches!(self, WireValue::Null | WireValue::Unknown)
    }

    /// Sub-value lookup for object values.
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        match self {
            WireValue::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Shape name used in decode error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            WireValue::Unknown => "unknown",
            WireValue::Null => "null",
            WireValue::String(_) => "string",
            WireValue::Bool(_) => "bool",
            WireValue::Number(_) => "number",
            WireValue::List(_) => "list",
            WireValue::Object(_) => "object",
        }
    }

    /// Build an object value from key/value pairs.
    pub fn object(fields: impl IntoIterator<Item = (String, WireValue)>) -> Self {
        WireValue::Object(fields.into_iter().collect())
    }

    /// Encode to the JSON mapping.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            WireValue::Unknown => {
                serde_json::json!({ UNKNOWN_KEY: true })
            }
            WireValue::Null => serde_json::Value::Null,
            WireValue::String(s) => serde_json::Value::String(s.clone()),
            WireValue::Bool(b) => serde_json::Value::Bool(*b),
            WireValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            WireValue::List(items) => {
                serde_json::Value::Array(items.iter().map(WireValue::to_json).collect())
            }
            WireValue::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Decode from the JSON mapping.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => WireValue::Null,
            serde_json::Value::Bool(b) => WireValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(WireValue::Number)
                .unwrap_or(WireValue::Null),
            serde_json::Value::String(s) => WireValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                WireValue::List(items.iter().map(WireValue::from_json).collect())
            }
            serde_json::Value::Object(fields) => {
                if fields.len() == 1 && fields.get(UNKNOWN_KEY) == Some(&serde_json::Value::Bool(true))
                {
                    return WireValue::Unknown;
                }
                WireValue::Object(
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), WireValue::from_json(v)))
                        .collect(),
                )
            }
        }
    }
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(WireValue::from_json(&json))
    }
}
