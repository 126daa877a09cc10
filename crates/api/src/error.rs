//! JSON error responses.
//!
//! Every failure leaves the API as `{ "error": <code>, "message": <text> }`
//! with the status of the underlying error.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};
use sharedesk_client::ClientError;
use sharedesk_core::ledger::LedgerError;
use sharedesk_shared::AppError;
use tracing::error;
use validator::ValidationErrors;

/// JSON request body whose rejection renders as an [`ApiError`].
pub type JsonBody<T> = WithRejection<Json<T>, ApiError>;

/// An error ready to be rendered as a response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
            details: None,
        }
    }

    /// Status the response will carry.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        AppError::from(err).into()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.to_string()).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match &rejection {
            JsonRejection::MissingJsonContentType(_) => "UNSUPPORTED_MEDIA_TYPE",
            JsonRejection::JsonSyntaxError(_) => "MALFORMED_JSON",
            _ => "INVALID_BODY",
        };
        Self::new(rejection.status().as_u16(), code, rejection.body_text())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let mut api = Self::new(err.http_status_code(), err.error_code(), err.to_string());
        if let LedgerError::InsufficientHolding {
            available,
            requested,
        } = err
        {
            api.details = Some(json!({
                "available_quantity": available,
                "requested_quantity": requested
            }));
        }
        api
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                code = self.code,
                message = %self.message,
                "Request failed"
            );
        }
        let mut body = json!({
            "error": self.code,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}
