use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("snapshot has no value")]
    Absent,

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Coarse classification of a [`RequestError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Name resolution or connection setup failed; no status is available.
    Connectivity,
    /// The remote answered with a non-2xx status.
    Remote,
    /// The transport failed after connecting, without a usable status.
    Transport,
    /// The transport call was cancelled before a response arrived.
    Cancelled,
    /// The payload could not be encoded for sending.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connectivity => "connectivity",
            Self::Remote => "remote",
            Self::Transport => "transport",
            Self::Cancelled => "cancelled",
            Self::Serialization => "serialization",
        };
        f.write_str(name)
    }
}

/// The single failure shape reported by every remote operation.
///
/// `status` is `None` whenever no HTTP status line was obtained, e.g. for
/// DNS failures or payloads that never left the client.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestError {
    pub status: Option<u16>,
    pub message: String,
    pub kind: ErrorKind,
}

impl RequestError {
    pub fn new(kind: ErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind,
        }
    }

    /// An error answered by the remote with the given status.
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote, status, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, None, message)
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} error ({code}): {}", self.kind, self.message),
            None => write!(f, "{} error: {}", self.kind, self.message),
        }
    }
}
