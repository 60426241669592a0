//! Request bodies for write operations.

use serde::de::IgnoredAny;
use serde_json::Value;

use rtdb_types::{server_timestamp, RequestError};

/// The value written by `set`, `update` and `push`.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Plain text, stored as a JSON string.
    Text(String),
    /// Text that already is JSON. Validated, then sent as is.
    RawJson(String),
    /// A structured value.
    Value(Value),
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn json(json: impl Into<String>) -> Self {
        Self::RawJson(json.into())
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// The server-side timestamp placeholder, `{".sv":"timestamp"}`.
    pub fn server_timestamp() -> Self {
        Self::Value(server_timestamp())
    }

    /// JSON text of the payload.
    pub fn to_json(&self) -> Result<String, RequestError> {
        match self {
            Self::Text(text) => serde_json::to_string(text)
                .map_err(|e| RequestError::serialization(e.to_string())),
            Self::RawJson(json) => {
                serde_json::from_str::<IgnoredAny>(json)
                    .map_err(|e| RequestError::serialization(format!("payload is not JSON: {e}")))?;
                Ok(json.trim().to_string())
            }
            Self::Value(value) => Ok(value.to_string()),
        }
    }

    /// Wire bytes: the JSON text with every non-ASCII character escaped, so
    /// each character occupies exactly one byte.
    pub fn encode(&self) -> Result<Vec<u8>, RequestError> {
        Ok(encode_single_byte(&self.to_json()?).into_bytes())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Replace non-ASCII characters with `\uXXXX` escapes (UTF-16 code units).
///
/// Only valid inside JSON string literals, which is the only place a JSON
/// document can carry non-ASCII text.
fn encode_single_byte(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtdb_types::ErrorKind;
    use serde_json::json;

    #[test]
    fn text_is_quoted() {
        assert_eq!(Payload::text("hello").to_json().unwrap(), "\"hello\"");
        assert_eq!(Payload::from("a\"b").to_json().unwrap(), r#""a\"b""#);
    }

    #[test]
    fn raw_json_passes_through() {
        let p = Payload::json(r#" {"name":"Ann"} "#);
        assert_eq!(p.to_json().unwrap(), r#"{"name":"Ann"}"#);
    }

    #[test]
    fn invalid_raw_json_is_serialization_error() {
        let err = Payload::json("{nope").to_json().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn value_serializes_compactly() {
        let p = Payload::from(json!({"name": "Ann"}));
        assert_eq!(p.to_json().unwrap(), r#"{"name":"Ann"}"#);
    }

    #[test]
    fn server_timestamp_is_exact() {
        assert_eq!(
            Payload::server_timestamp().encode().unwrap(),
            br#"{".sv":"timestamp"}"#.to_vec()
        );
    }

    #[test]
    fn non_ascii_is_escaped() {
        let bytes = Payload::text("café").encode().unwrap();
        assert_eq!(bytes, b"\"caf\\u00e9\"".to_vec());
        assert!(bytes.is_ascii());
    }

    #[test]
    fn astral_chars_use_surrogate_pairs() {
        let bytes = Payload::text("😀").encode().unwrap();
        assert_eq!(bytes, b"\"\\ud83d\\ude00\"".to_vec());
        let decoded: String = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, "😀");
    }
}
