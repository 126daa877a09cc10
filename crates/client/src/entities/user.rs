//! Dashboard users.

use serde::{Deserialize, Serialize};
use sharedesk_shared::types::UserId;
use validator::{Validate, ValidationError};

use crate::wire;

/// A user as listed by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Upstream identifier.
    pub id: UserId,
    /// Client-facing user number.
    #[serde(default, deserialize_with = "wire::optional_integer")]
    pub uid: Option<i64>,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Ten-digit phone number.
    #[serde(default)]
    pub contact: Option<String>,
    /// Role assigned upstream.
    #[serde(default)]
    pub role: Option<String>,
    /// Whether the user is active.
    #[serde(default, deserialize_with = "wire::flag")]
    pub status: bool,
}

/// Payload for creating or updating a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserInput {
    /// Client-facing user number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Contact email.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    /// Ten-digit phone number.
    #[validate(custom(function = "validate_contact"))]
    pub contact: String,
    /// Initial password, required by the upstream on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    /// Whether the user is active.
    #[serde(default = "default_active")]
    pub status: bool,
}

const fn default_active() -> bool {
    true
}

fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    if contact.len() == 10 && contact.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("contact");
        err.message = Some("Contact number must be 10 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input(email: &str, contact: &str) -> UserInput {
        UserInput {
            uid: None,
            name: "Asha".to_string(),
            email: email.to_string(),
            contact: contact.to_string(),
            password: None,
            status: true,
        }
    }

    #[rstest]
    #[case("asha@example.com", "9876543210", true)]
    #[case("asha@example.com", "98765", false)]
    #[case("asha@example.com", "98765432ab", false)]
    #[case("not-an-email", "9876543210", false)]
    fn test_user_input_validation(#[case] email: &str, #[case] contact: &str, #[case] ok: bool) {
        assert_eq!(input(email, contact).validate().is_ok(), ok);
    }

    #[test]
    fn test_decodes_numeric_status() {
        let user: User = serde_json::from_str(
            r#"{"id": 4, "uid": "1004", "name": "Ravi", "email": "r@example.com", "contact": "9123456780", "status": 1}"#,
        )
        .unwrap();
        assert_eq!(user.id, UserId::new(4));
        assert_eq!(user.uid, Some(1004));
        assert!(user.status);
    }
}
