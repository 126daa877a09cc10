//! Client error types.

use sharedesk_core::ledger::{StoreError, TransactionValidationError};
use sharedesk_shared::AppError;
use thiserror::Error;

/// Errors returned by upstream calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got an answer (connection, TLS, timeout).
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// The upstream refused the token (401 or 403).
    #[error("Upstream session is not authorized")]
    Unauthorized,

    /// The upstream answered with a non-success status.
    #[error("Upstream returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the upstream body, or the status reason.
        message: String,
    },

    /// The body could not be decoded.
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    /// A share row carries an invalid trade.
    #[error("Invalid share record: {0}")]
    InvalidRecord(#[from] TransactionValidationError),
}

impl ClientError {
    /// Returns true for a 404 from the upstream.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(message) => Self::Unavailable(message),
            ClientError::Unauthorized => Self::Unauthorized,
            ClientError::Status {
                status: 404,
                message,
            } => Self::NotFound(message),
            ClientError::Status { status, message } if status >= 500 => {
                Self::Unavailable(format!("upstream returned {status}: {message}"))
            }
            ClientError::Status { status, message } => Self::Rejected { status, message },
            ClientError::Decode(message) => Self::Malformed(message),
            ClientError::InvalidRecord(err) => Self::InvalidRecord(err),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(message) => Self::Unavailable(message),
            ClientError::Unauthorized => Self::Unauthorized("Session expired".to_string()),
            ClientError::Status {
                status: 404,
                message,
            } => Self::NotFound(message),
            ClientError::Status {
                status: 409,
                message,
            } => Self::Conflict(message),
            ClientError::Status { status, message } if (400..500).contains(&status) => {
                Self::Validation(message)
            }
            ClientError::Status { status, message } => {
                Self::ExternalService(format!("{status}: {message}"))
            }
            ClientError::Decode(message) => Self::ExternalService(message),
            ClientError::InvalidRecord(err) => Self::ExternalService(err.to_string()),
        }
    }
}
