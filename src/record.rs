use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single persisted entry: an application value bound to its unique key.
///
/// `deny_unknown_fields` makes "parses as a `Record`" an exact shape test, so
/// foreign entries sharing the container file never masquerade as records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Unique string identifier. At most one record per key exists in a
    /// container; the store enforces this, not the engine.
    pub key: String,
    /// The stored payload, opaque to the store.
    pub value: Value,
}

impl Record {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Parses a raw container entry back into a `Record`, or `None` if the
    /// entry is not exactly record-shaped.
    pub fn from_entry(entry: &Value) -> Option<Record> {
        serde_json::from_value(entry.clone()).ok()
    }
}

/// A partially-bound match pattern over container entries.
///
/// An unbound template matches every entry, record-shaped or not; a template
/// bound to a key matches only record-shaped entries carrying that key.
#[derive(Debug, Clone, Default)]
pub struct Template {
    key: Option<String>,
}

impl Template {
    /// Matches every entry in the container.
    pub fn any() -> Self {
        Self { key: None }
    }

    /// Matches records whose key equals `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    pub fn matches(&self, entry: &Value) -> bool {
        match &self.key {
            None => true,
            Some(key) => {
                is_record_shaped(entry)
                    && entry.get("key").and_then(Value::as_str) == Some(key.as_str())
            }
        }
    }
}

fn is_record_shaped(entry: &Value) -> bool {
    entry.as_object().is_some_and(|map| {
        map.len() == 2
            && map.get("key").is_some_and(Value::is_string)
            && map.contains_key("value")
    })
}
