//! Mapping of every failed request to one [`RequestError`].
//!
//! Two kinds of failure reach the normalizer: the transport never produced a
//! response, or the remote answered with a non-2xx status. Both end up as a
//! `RequestError` with an optional status and a human-readable message.

use serde_json::Value;

use rtdb_transport::TransportError;
use rtdb_types::{ErrorKind, RequestError};

/// Message used when the host could not be reached at all.
pub const CONNECTIVITY_MESSAGE: &str = "No internet connection or policy problem";

/// Message used when the transport reported nothing useful.
pub const NO_INFO_MESSAGE: &str = "Request failed with no info of error.";

pub const CANCELLED_MESSAGE: &str = "request cancelled";

/// Transport texts that mean the host was never reached.
const CONNECTIVITY_MARKERS: &[&str] = &["couldn't resolve", "could not resolve", "crossdomain.xml"];

/// Transport text that carries no information about the cause.
const NO_INFO_MARKER: &str = "Failed downloading";

/// A failed request, before normalization.
#[derive(Clone, Copy, Debug)]
pub enum Failure<'a> {
    /// No response was obtained.
    Transport(&'a TransportError),
    /// The remote answered with a non-success status.
    Status { status_line: &'a str, body: &'a str },
}

/// Turn a failure into the error reported to callers and hooks.
pub fn normalize(failure: Failure<'_>) -> RequestError {
    match failure {
        Failure::Transport(TransportError::Cancelled) => {
            RequestError::new(ErrorKind::Cancelled, None, CANCELLED_MESSAGE)
        }
        Failure::Transport(err) if err.is_connectivity() => connectivity(),
        Failure::Transport(err) => {
            let text = err.to_string();
            if is_connectivity_text(&text) {
                return connectivity();
            }
            RequestError::new(ErrorKind::Transport, None, without_noise(text))
        }
        Failure::Status { status_line, body } => {
            let status = parse_status_line(status_line);
            let message = error_field(body).unwrap_or_else(|| status_text(status_line));
            RequestError::remote(status, without_noise(message))
        }
    }
}

/// Status code of an `HTTP/<version> <code> <reason...>` line.
///
/// Lines with fewer than three space-separated tokens, or with a
/// non-numeric code, yield `None`.
pub fn parse_status_line(line: &str) -> Option<u16> {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() < 3 {
        return None;
    }
    tokens[1].parse().ok()
}

fn connectivity() -> RequestError {
    RequestError::new(ErrorKind::Connectivity, None, CONNECTIVITY_MESSAGE)
}

fn is_connectivity_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    CONNECTIVITY_MARKERS.iter().any(|m| lower.contains(m))
}

fn without_noise(message: String) -> String {
    if message.is_empty() || message.contains(NO_INFO_MARKER) {
        NO_INFO_MESSAGE.to_string()
    } else {
        message
    }
}

/// The string `error` member of a JSON object body, if any.
fn error_field(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(map) => match map.get("error") {
            Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Status line without the protocol version, e.g. `400 Bad Request`.
fn status_text(line: &str) -> String {
    match line.split_once(' ') {
        Some((version, rest)) if version.starts_with("HTTP/") => rest.trim().to_string(),
        _ => line.trim().to_string(),
    }
}
