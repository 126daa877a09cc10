//! Authentication payloads exchanged with the upstream API.
//!
//! Tokens are issued by the upstream; this service only carries them.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Bearer token issued by the upstream API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token. Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Login request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token, when the upstream issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Password reset payload, in the upstream's field naming.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Account email.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    /// Replacement password.
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_rejects_blank() {
        assert!(AccessToken::new("   ").is_none());
        assert_eq!(AccessToken::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("secret-value").unwrap();
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "pw".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_reset_password_uses_camel_case() {
        let request = ResetPasswordRequest {
            email: "admin@example.com".to_string(),
            old_password: "old".to_string(),
            new_password: "new-password".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["oldPassword"], "old");
        assert_eq!(json["newPassword"], "new-password");
    }
}
