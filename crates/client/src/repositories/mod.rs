//! Repository abstractions for the upstream API.
//!
//! Each repository wraps an [`ApiClient`](crate::ApiClient) and mirrors one
//! upstream resource, hiding paths and wire formats from the rest of the
//! application.

pub mod auth;
pub mod dashboard;
pub mod script;
pub mod share;
pub mod user;

pub use auth::AuthRepository;
pub use dashboard::DashboardRepository;
pub use script::ScriptRepository;
pub use share::ShareRepository;
pub use user::UserRepository;

use serde::Serialize;
use sharedesk_shared::types::{PageRequest, SortOrder};

/// Paging part of an upstream list body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListBody<'a> {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<SortOrder>,
}

impl<'a> ListBody<'a> {
    pub(crate) fn new(page: &'a PageRequest) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            search: page.search.as_deref(),
            sort_field: page.sort_field.as_deref(),
            sort_order: page.sort_order,
        }
    }
}

/// Body of the delete calls.
#[derive(Debug, Serialize)]
pub(crate) struct IdBody<T> {
    pub(crate) id: T,
}
