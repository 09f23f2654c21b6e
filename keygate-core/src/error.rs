//! Error types for credential handling and inference calls.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the credential subsystem and the client.
#[derive(Debug, Error)]
pub enum Error {
    /// No credential was found in any source.
    #[error(
        "no API key found: pass one explicitly, set ANTHROPIC_API_KEY, or save it to the credentials file"
    )]
    MissingCredential,

    /// A credential value that cannot be used as a key.
    #[error("invalid API key: {0}")]
    InvalidCredential(String),

    /// Reading or writing the credentials file failed.
    #[error("credentials file {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote inference call failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl Error {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Category of a failed inference call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceErrorKind {
    /// The request never produced an HTTP response.
    Network,
    /// The API rejected the key (401/403).
    Authentication,
    /// The API asked us to slow down (429).
    RateLimited,
    /// Any other non-success status.
    Api { status: u16 },
    /// The response body could not be decoded or had no text.
    MalformedResponse,
    /// The request was rejected before it was sent.
    InvalidRequest,
}

impl fmt::Display for InferenceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network error"),
            Self::Authentication => write!(f, "authentication failed"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Api { status } => write!(f, "API error ({status})"),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::InvalidRequest => write!(f, "invalid request"),
        }
    }
}

/// A failed call to the remote inference surface.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct InferenceError {
    pub kind: InferenceErrorKind,
    pub message: String,
}

impl InferenceError {
    pub fn new(kind: InferenceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(InferenceErrorKind::Network, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(InferenceErrorKind::MalformedResponse, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(InferenceErrorKind::InvalidRequest, message)
    }

    /// Map an HTTP status to the matching error kind.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 | 403 => InferenceErrorKind::Authentication,
            429 => InferenceErrorKind::RateLimited,
            _ => InferenceErrorKind::Api { status },
        };
        Self::new(kind, message)
    }

    /// Whether the key itself was rejected.
    pub fn is_auth(&self) -> bool {
        self.kind == InferenceErrorKind::Authentication
    }
}
