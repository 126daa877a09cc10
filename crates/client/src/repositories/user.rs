//! User management.

use serde::Serialize;
use sharedesk_shared::types::{PageRequest, PageResponse, UserId};

use super::{IdBody, ListBody};
use crate::client::ApiClient;
use crate::entities::{User, UserInput};
use crate::error::ClientError;
use crate::wire::{Envelope, ListEnvelope};

/// User CRUD against the upstream.
#[derive(Debug, Clone)]
pub struct UserRepository {
    client: ApiClient,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    id: UserId,
    #[serde(flatten)]
    input: &'a UserInput,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists one page of users.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<User>, ClientError> {
        let list: ListEnvelope<User> = self
            .client
            .post("/user/user_list", &ListBody::new(page))
            .await?;
        Ok(PageResponse::new(list.data, page.page, page.limit, list.total))
    }

    /// Creates a user.
    pub async fn create(&self, input: &UserInput) -> Result<User, ClientError> {
        let envelope: Envelope<User> = self.client.post("/user/create_user", input).await?;
        Ok(envelope.into_inner())
    }

    /// Replaces a user's details.
    pub async fn update(&self, id: UserId, input: &UserInput) -> Result<User, ClientError> {
        let envelope: Envelope<User> = self
            .client
            .post("/user/update_user", &UpdateBody { id, input })
            .await?;
        Ok(envelope.into_inner())
    }

    /// Deletes a user.
    pub async fn delete(&self, id: UserId) -> Result<(), ClientError> {
        self.client
            .post_unit("/user/delete_user", &IdBody { id })
            .await
    }
}
