//! Error types for document fetch operations.

use thiserror::Error;

/// Discriminant of everything that can keep a document from being shown.
///
/// `UnsupportedType` is not a fetch failure: it is reached after a successful
/// fetch when the content cannot be previewed, and only shares the message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    AuthMissing,
    HttpError,
    NoUrlInResponse,
    PayloadReadError,
    Network,
    UnsupportedType,
}

impl FailureKind {
    /// Short human-readable message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::AuthMissing => "session expired, please sign in again",
            FailureKind::HttpError => "document request failed",
            FailureKind::NoUrlInResponse => "document link unavailable",
            FailureKind::PayloadReadError => "document could not be read",
            FailureKind::Network => "document service unreachable",
            FailureKind::UnsupportedType => "preview not available",
        }
    }

    /// Stable identifier, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            FailureKind::AuthMissing => "auth_missing",
            FailureKind::HttpError => "http_error",
            FailureKind::NoUrlInResponse => "no_url_in_response",
            FailureKind::PayloadReadError => "payload_read_error",
            FailureKind::Network => "network",
            FailureKind::UnsupportedType => "unsupported_type",
        }
    }
}

/// Errors that can occur while fetching a document.
///
/// These never escape the fetcher as `Err`; they travel inside
/// [`FetchResult::Failure`](super::FetchResult::Failure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Session identifier or bearer token missing; no request was sent
    #[error("session credentials are missing")]
    AuthMissing,

    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    HttpError {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or a generic status-coded one
        message: String,
    },

    /// JSON envelope without a `url`/`document_url` field
    #[error("response did not contain a document URL")]
    NoUrlInResponse,

    /// Response body could not be read
    #[error("failed to read document payload: {detail}")]
    PayloadReadError {
        /// Underlying read error
        detail: String,
    },

    /// No response at all (DNS, connection, timeout)
    #[error("network error: {detail}")]
    Network {
        /// Underlying transport error
        detail: String,
    },
}

impl FetchFailure {
    /// Create an HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::HttpError {
            status,
            message: message.into(),
        }
    }

    /// Create a payload read error.
    pub fn payload_read(detail: impl Into<String>) -> Self {
        Self::PayloadReadError {
            detail: detail.into(),
        }
    }

    /// Create a network error.
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FetchFailure::AuthMissing => FailureKind::AuthMissing,
            FetchFailure::HttpError { .. } => FailureKind::HttpError,
            FetchFailure::NoUrlInResponse => FailureKind::NoUrlInResponse,
            FetchFailure::PayloadReadError { .. } => FailureKind::PayloadReadError,
            FetchFailure::Network { .. } => FailureKind::Network,
        }
    }

    /// Message for the failure notification.
    ///
    /// HTTP errors carry the server's own message; everything else uses the
    /// kind's fixed text.
    pub fn user_message(&self) -> String {
        match self {
            FetchFailure::HttpError { message, .. } if !message.is_empty() => message.clone(),
            other => other.kind().user_message().to_string(),
        }
    }
}
