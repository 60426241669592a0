use thiserror::Error;

/// Failures reported by a transport before any HTTP status was obtained.
///
/// Non-2xx answers are not errors at this layer; they arrive as an
/// [`crate::HttpResponse`] and are interpreted by the caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("couldn't resolve host: {0}")]
    Resolve(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("body error: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether the failure means the host was never reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Resolve(_) | Self::Connect(_))
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
