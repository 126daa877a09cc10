//! Ledger error types.
//!
//! This module defines the errors returned by the ledger flows: invalid
//! input, insufficient holdings, missing transactions, and failures of the
//! persistence collaborator.

use sharedesk_shared::types::ShareId;
use thiserror::Error;

use super::service::StoreError;
use super::validation::TransactionValidationError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A candidate or stored record failed validation.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(#[from] TransactionValidationError),

    /// A sell asks for more units than are held.
    #[error("Not enough shares available for selling. Available: {available}, requested: {requested}")]
    InsufficientHolding {
        /// Units currently held.
        available: i64,
        /// Units the sell asked for.
        requested: i64,
    },

    /// The transaction being edited does not exist.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(ShareId),

    // ========== Collaborator Errors ==========
    /// The store rejected the access token.
    #[error("Upstream session is not authorized")]
    CollaboratorUnauthorized,

    /// The store refused the request.
    #[error("Upstream rejected the request ({status}): {message}")]
    CollaboratorRejected {
        /// Status reported by the store.
        status: u16,
        /// Message reported by the store.
        message: String,
    },

    /// The store could not be reached.
    #[error("Upstream unavailable: {0}")]
    CollaboratorUnavailable(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransaction(_) => "INVALID_TRANSACTION",
            Self::InsufficientHolding { .. } => "INSUFFICIENT_HOLDING",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::CollaboratorUnauthorized => "UNAUTHORIZED",
            Self::CollaboratorRejected { .. } => "UPSTREAM_REJECTED",
            Self::CollaboratorUnavailable(_) => "UPSTREAM_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTransaction(_) => 400,
            Self::CollaboratorUnauthorized => 401,
            Self::TransactionNotFound(_) => 404,
            Self::InsufficientHolding { .. } => 422,
            Self::CollaboratorRejected { status, .. } if (400..500).contains(status) => *status,
            Self::CollaboratorRejected { .. } => 502,
            Self::CollaboratorUnavailable(_) => 503,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => Self::CollaboratorUnavailable(message),
            StoreError::Unauthorized => Self::CollaboratorUnauthorized,
            StoreError::NotFound(message) => Self::CollaboratorRejected {
                status: 404,
                message,
            },
            StoreError::Rejected { status, message } => {
                Self::CollaboratorRejected { status, message }
            }
            StoreError::InvalidRecord(err) => Self::InvalidTransaction(err),
            StoreError::Malformed(message) => Self::CollaboratorRejected {
                status: 502,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InsufficientHolding {
                available: 1,
                requested: 2
            }
            .error_code(),
            "INSUFFICIENT_HOLDING"
        );
        assert_eq!(
            LedgerError::TransactionNotFound(ShareId::new(7)).error_code(),
            "TRANSACTION_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::CollaboratorUnavailable("down".into()).error_code(),
            "UPSTREAM_UNAVAILABLE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        let invalid: LedgerError =
            TransactionValidationError::NonPositivePrice(Decimal::ZERO).into();
        assert_eq!(invalid.http_status_code(), 400);
        assert_eq!(
            LedgerError::InsufficientHolding {
                available: 0,
                requested: 1
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::CollaboratorRejected {
                status: 409,
                message: "duplicate".into()
            }
            .http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::CollaboratorRejected {
                status: 500,
                message: "boom".into()
            }
            .http_status_code(),
            502
        );
    }

    #[test]
    fn test_insufficient_holding_message() {
        let err = LedgerError::InsufficientHolding {
            available: 15,
            requested: 20,
        };
        assert_eq!(
            err.to_string(),
            "Not enough shares available for selling. Available: 15, requested: 20"
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let err: LedgerError = StoreError::Unavailable("timeout".into()).into();
        assert!(matches!(err, LedgerError::CollaboratorUnavailable(_)));

        let err: LedgerError = StoreError::Unauthorized.into();
        assert_eq!(err.http_status_code(), 401);
    }
}
