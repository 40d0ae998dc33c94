//! Error types for the Pinecone client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the index does not exist" from "the service rejected the request" (for
//! example to make deletes idempotent). All other non-2xx responses land in
//! `RequestFailed` with the raw status code and body for debugging.
//! `InvalidParameters` is only ever produced locally, before any request is
//! handed to a transport.

use thiserror::Error;

/// Boxed error produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, PineconeError>;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum PineconeError {
    /// The call was rejected locally; nothing was sent.
    #[error("invalid params: {0}")]
    InvalidParameters(String),

    /// The service returned 404 for a named index.
    #[error("index not found")]
    NotFound,

    /// The service returned any other non-success status.
    #[error("request failed: {body}, status code: {status}")]
    RequestFailed { status: u16, body: String },

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body did not match the expected schema.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Required configuration was missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PineconeError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PineconeError::InvalidParameters(reason.into())
    }

    pub fn transport(err: impl Into<BoxError>) -> Self {
        PineconeError::Transport(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PineconeError::NotFound)
    }

    /// Status code of a `RequestFailed` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            PineconeError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
