use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Wire form of the server timestamp placeholder.
///
/// The remote replaces this object with its own clock (milliseconds since
/// the UNIX epoch) at write time.
pub const SERVER_TIMESTAMP_JSON: &str = r#"{".sv":"timestamp"}"#;

/// The server timestamp placeholder as a JSON value.
pub fn server_timestamp() -> Value {
    json!({ ".sv": "timestamp" })
}

/// Convert a server timestamp (ms since the UNIX epoch) into a UTC datetime.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn timestamp_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
