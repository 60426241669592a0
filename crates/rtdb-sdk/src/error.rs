use rtdb_transport::TransportError;
use rtdb_types::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid path key {key:?}: {reason}")]
    InvalidPath { key: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport setup error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// The normalized request error, if this failure came from a request.
    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            Self::Request(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of a remote failure.
    pub fn status(&self) -> Option<u16> {
        self.as_request().and_then(|e| e.status)
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
