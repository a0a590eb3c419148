//! Error types for NekoStats.
//!
//! This module defines the `StatsError` enum which represents all possible
//! errors that can occur while ingesting events or answering queries.

use thiserror::Error;

/// The main error type for NekoStats operations.
///
/// This enum covers all error cases that can occur during event ingestion,
/// range parsing, aggregation queries, and storage operations. An empty query
/// result is never an error: it produces an empty summary.
#[derive(Debug, Error)]
pub enum StatsError {
    // ==================== Validation Errors ====================
    /// A required field is missing from a submission.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A field value is invalid.
    #[error("Invalid field value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The range selector token is not one of "24h", "7d", or empty.
    #[error("Unrecognized range selector: '{token}'")]
    InvalidRange { token: String },

    // ==================== Authorization ====================
    /// The caller did not pass the injected authorization check.
    #[error("Not authorized")]
    Unauthorized,

    // ==================== Storage Errors ====================
    /// The event store failed or timed out. Safe to retry.
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    // ==================== Internal Errors ====================
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl StatsError {
    /// Creates a new missing-field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a new invalid-field error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a caller-facing error (vs internal/transient).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::InvalidRange { .. }
                | Self::Unauthorized
        )
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::InvalidRange { .. } => 400,
            Self::MissingField { .. } | Self::InvalidField { .. } => 422,
            Self::Unavailable { .. } => 503,
            _ => 500,
        }
    }
}

/// A Result type alias using StatsError.
pub type StatsResult<T> = Result<T, StatsError>;

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}
