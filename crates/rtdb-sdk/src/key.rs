//! Path key validation.
//!
//! Valid keys:
//! - Must be non-empty and at most [`MAX_KEY_BYTES`] bytes
//! - Must not contain `/`, which would split one key into several segments
//! - Must not contain `.`, `$`, `#`, `[` or `]`, which the remote reserves
//! - Must not contain ASCII control characters

use crate::error::{SdkError, SdkResult};

/// Longest key the remote accepts, in UTF-8 bytes.
pub const MAX_KEY_BYTES: usize = 768;

/// Characters that are forbidden anywhere in a key.
const FORBIDDEN_CHARS: &[char] = &['/', '.', '$', '#', '[', ']'];

/// Validate a single path key, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use rtdb_sdk::key::validate_key;
///
/// assert!(validate_key("users").is_ok());
/// assert!(validate_key("-Nq3xk_2").is_ok());
/// assert!(validate_key("").is_err());
/// assert!(validate_key("a/b").is_err());
/// ```
pub fn validate_key(key: &str) -> SdkResult<()> {
    if key.is_empty() {
        return Err(invalid(key, "key must not be empty".into()));
    }

    if key.len() > MAX_KEY_BYTES {
        return Err(invalid(
            key,
            format!("key is {} bytes (max {MAX_KEY_BYTES})", key.len()),
        ));
    }

    for ch in FORBIDDEN_CHARS {
        if key.contains(*ch) {
            return Err(invalid(key, format!("contains forbidden character: {ch:?}")));
        }
    }

    if let Some(ch) = key.chars().find(|c| c.is_ascii_control()) {
        return Err(invalid(key, format!("contains control character: {ch:?}")));
    }

    Ok(())
}

/// Split a slash-separated path into validated keys.
///
/// One leading and one trailing `/` are tolerated; empty segments are not.
pub fn split_path(path: &str) -> SdkResult<Vec<&str>> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(invalid(path, "path must name at least one key".into()));
    }
    let keys: Vec<&str> = trimmed.split('/').collect();
    for key in &keys {
        validate_key(key).map_err(|_| {
            if key.is_empty() {
                invalid(path, "path segments must not be empty".into())
            } else {
                invalid(path, format!("invalid segment {key:?}"))
            }
        })?;
    }
    Ok(keys)
}

fn invalid(key: &str, reason: String) -> SdkError {
    SdkError::InvalidPath {
        key: key.to_string(),
        reason,
    }
}
