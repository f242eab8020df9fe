//! A closed "any JSON value" container for freeform extraction payloads.
//!
//! The scrape endpoint's `llm_extraction`, `extract` and `actions` fields
//! carry arbitrarily shaped JSON. Rather than exposing raw dynamic values,
//! this module models them as a closed tagged variant with an explicit
//! decode precedence, so an integral number always decodes as [`JsonValue::Int`]
//! and never as a float.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An arbitrary JSON value restricted to the shapes the service emits.
///
/// Decode tries, in order: integer, string, boolean, float, sequence,
/// mapping. The first shape that matches wins. JSON `null` is outside the
/// closed set and fails to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// An integral number.
    Int(i64),
    /// A string.
    Str(String),
    /// A boolean.
    Bool(bool),
    /// A non-integral number.
    Float(f64),
    /// A sequence of values.
    Seq(Vec<JsonValue>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, JsonValue>),
}

impl JsonValue {
    /// Convert a dynamic [`serde_json::Value`] following the decode
    /// precedence list.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, String> {
        // Precedence: integer, string, boolean, float, sequence, mapping.
        if let Some(i) = value.as_i64() {
            return Ok(JsonValue::Int(i));
        }
        if let Some(s) = value.as_str() {
            return Ok(JsonValue::Str(s.to_string()));
        }
        if let Some(b) = value.as_bool() {
            return Ok(JsonValue::Bool(b));
        }
        if let Some(f) = value.as_f64() {
            return Ok(JsonValue::Float(f));
        }
        if let Some(seq) = value.as_array() {
            let items = seq
                .iter()
                .map(JsonValue::from_value)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(JsonValue::Seq(items));
        }
        if let Some(map) = value.as_object() {
            let entries = map
                .iter()
                .map(|(k, v)| Ok((k.clone(), JsonValue::from_value(v)?)))
                .collect::<Result<BTreeMap<_, _>, String>>()?;
            return Ok(JsonValue::Map(entries));
        }
        Err(format!("unsupported JSON value: {value}"))
    }

    /// Convert back into a dynamic [`serde_json::Value`].
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            JsonValue::Int(i) => serde_json::Value::from(*i),
            JsonValue::Str(s) => serde_json::Value::from(s.clone()),
            JsonValue::Bool(b) => serde_json::Value::from(*b),
            JsonValue::Float(f) => serde_json::Value::from(*f),
            JsonValue::Seq(items) => {
                serde_json::Value::Array(items.iter().map(JsonValue::to_value).collect())
            }
            JsonValue::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        JsonValue::from_value(&value).map_err(de::Error::custom)
    }
}

impl Serialize for JsonValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}
