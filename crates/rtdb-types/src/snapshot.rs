//! Read-only view over the JSON value returned by a request.
//!
//! A [`Snapshot`] is built exactly once from a response body and never
//! changes afterwards. A `null`, empty or whitespace-only body is the
//! does-not-exist state: [`Snapshot::exists`] returns `false`, but it is a
//! successful result, not an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TypeError;

/// Immutable result of a completed request.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    value: Option<Value>,
    raw: String,
}

impl Snapshot {
    /// Build a snapshot from a raw response body.
    ///
    /// Bodies that are not valid JSON are kept as a JSON string value so the
    /// caller still sees what the remote sent.
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::absent();
        }
        let value = match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Null) => None,
            Ok(v) => Some(v),
            Err(_) => Some(Value::String(body.to_string())),
        };
        Self {
            value,
            raw: body.to_string(),
        }
    }

    /// Build a snapshot around an already parsed value.
    pub fn from_value(value: Value) -> Self {
        let raw = value.to_string();
        match value {
            Value::Null => Self { value: None, raw },
            v => Self { value: Some(v), raw },
        }
    }

    /// The does-not-exist snapshot.
    pub fn absent() -> Self {
        Self {
            value: None,
            raw: "null".into(),
        }
    }

    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Value {
        self.value.unwrap_or(Value::Null)
    }

    /// The body exactly as received.
    pub fn raw_json(&self) -> &str {
        &self.raw
    }

    /// Snapshot of a direct child. Missing children are absent snapshots.
    pub fn child(&self, key: &str) -> Snapshot {
        let child = match &self.value {
            Some(Value::Object(map)) => map.get(key).cloned(),
            Some(Value::Array(items)) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
            _ => None,
        };
        child.map(Self::from_value).unwrap_or_else(Self::absent)
    }

    pub fn has_child(&self, key: &str) -> bool {
        self.child(key).exists()
    }

    /// Keys of the top-level object, sorted. Push keys sort chronologically.
    ///
    /// Arrays report their indices; scalars and absent snapshots report none.
    pub fn keys(&self) -> Vec<String> {
        match &self.value {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn first_key(&self) -> Option<String> {
        self.keys().into_iter().next()
    }

    pub fn children_count(&self) -> usize {
        match &self.value {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// Deserialize the value into a concrete type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, TypeError> {
        let value = self.value.clone().ok_or(TypeError::Absent)?;
        serde_json::from_value(value).map_err(|e| TypeError::Deserialization(e.to_string()))
    }
}
