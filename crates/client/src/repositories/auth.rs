//! Authentication against the upstream.

use serde::Deserialize;
use sharedesk_shared::{LoginRequest, LoginResponse, ResetPasswordRequest};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::wire::Envelope;

/// Login and password reset.
#[derive(Debug, Clone)]
pub struct AuthRepository {
    client: ApiClient,
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    #[serde(default)]
    message: Option<String>,
}

impl AuthRepository {
    /// Creates a new auth repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for an access token.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let envelope: Envelope<LoginResponse> = self.client.post("/auth/login", request).await?;
        Ok(envelope.into_inner())
    }

    /// Changes the password of an account. Returns the upstream's message.
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<Option<String>, ClientError> {
        let ack: Acknowledgement = self.client.post("/auth/reset_password", request).await?;
        Ok(ack.message)
    }
}
