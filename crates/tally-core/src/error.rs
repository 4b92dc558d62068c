//! Error types for the tally client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, HTTP-status, business-envelope, validation, authentication,
//! input, and storage failures. Every variant carries the resolved
//! user-facing message in its `Display` output, so callers that surfaced a
//! notice and callers that only propagate see the same text.

use std::fmt;
use thiserror::Error;

use crate::envelope::FieldError;

/// The unified error type for tally operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors; no HTTP response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx HTTP responses, keyed by status code.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// 2xx transport, but the response envelope signalled failure.
    #[error("{0}")]
    Business(#[from] BusinessError),

    /// 422 responses carrying field-level detail.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Response body decode errors.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Input validation errors (invalid base URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential storage I/O errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// The user-facing message resolved for this error.
    ///
    /// This is the same text the request pipeline hands to a
    /// [`NoticeSink`](crate::traits::NoticeSink) when surfacing is enabled.
    pub fn message(&self) -> String {
        match self {
            Error::Http(err) => err.message.clone(),
            Error::Business(err) => err.message.clone(),
            Error::Validation(err) => err.joined(),
            other => other.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Other transport-layer failure.
    #[error("{message}")]
    Other { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The backend rejected the session; the caller must re-authenticate.
    #[error("session expired, please sign in again")]
    SessionExpired,

    /// Refresh token is missing, invalid, or expired.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,
}

/// A non-2xx HTTP response with its resolved message.
#[derive(Debug)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Resolved user-facing message.
    pub message: String,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}

/// A logical failure signalled by a 2xx response envelope.
#[derive(Debug)]
pub struct BusinessError {
    /// Business status code from the envelope.
    pub code: i64,
    /// Message from the envelope.
    pub message: String,
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BusinessError {}

/// A 422 response with field-level errors.
#[derive(Debug)]
pub struct ValidationError {
    /// Field errors reported by the backend, possibly empty.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// All field messages joined into a single notice.
    pub fn joined(&self) -> String {
        if self.errors.is_empty() {
            return "invalid request parameters".to_string();
        }
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

impl std::error::Error for ValidationError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid backend base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data did not parse.
    #[error("corrupt stored data: {0}")]
    Corrupt(serde_json::Error),

    /// No usable storage directory on this platform.
    #[error("no usable storage directory")]
    NoStorageDir,
}
