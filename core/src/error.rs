//! Error types for the places API client.
//!
//! # Design
//! Every failure a caller can observe is one of four `ApiError` variants.
//! Validation failures are raised before a request is built; anything that
//! goes wrong on the wire (transport error, non-2xx status, undecodable body)
//! is folded into `RemoteOperationFailed` so callers handle a single shape.
//!
//! Per-item failures reported inside a successful response are not errors;
//! they are data on the response types (see `response::Outcome`).

use crate::envelope::Operation;
use crate::response::ErrorCode;

/// Errors returned by `PlacesClient` and its session.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Puid, AuthProvider or EmailId is missing or empty.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// EmailId is not a syntactically valid address.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// An operation argument is out of bounds. No request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote call failed at the transport or API level.
    #[error("{message}")]
    RemoteOperationFailed {
        operation: Operation,
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        /// `ErrorCode` from the API body, when present.
        error_code: Option<ErrorCode>,
        message: String,
    },
}

impl ApiError {
    /// Build a normalized remote failure.
    ///
    /// `detail` is the richest message available (the API's own
    /// `ErrorMessage`, else the transport error text). A missing or blank
    /// detail falls back to the operation name alone.
    pub(crate) fn remote(
        operation: Operation,
        status: Option<u16>,
        error_code: Option<ErrorCode>,
        detail: Option<&str>,
    ) -> Self {
        let message = match detail.map(str::trim) {
            Some(detail) if !detail.is_empty() => {
                format!("Failed to {}: {detail}", operation.description())
            }
            _ => format!("Failed to {}", operation.description()),
        };
        ApiError::RemoteOperationFailed {
            operation,
            status,
            error_code,
            message,
        }
    }

    /// The operation a remote failure belongs to.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ApiError::RemoteOperationFailed { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Failure reported by a `Transport` implementation.
///
/// Carries only a message: the client decides how it is surfaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
