//! Script management and market data.

use serde::Serialize;
use sharedesk_shared::types::{PageRequest, PageResponse, ScriptId};

use super::{IdBody, ListBody};
use crate::client::ApiClient;
use crate::entities::{PricePoint, Script, ScriptInput};
use crate::error::ClientError;
use crate::wire::{Envelope, ListEnvelope};

/// Script CRUD and chart data.
#[derive(Debug, Clone)]
pub struct ScriptRepository {
    client: ApiClient,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    id: ScriptId,
    #[serde(flatten)]
    input: &'a ScriptInput,
}

impl ScriptRepository {
    /// Creates a new script repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists one page of scripts.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<Script>, ClientError> {
        let list: ListEnvelope<Script> = self
            .client
            .post("/script/list", &ListBody::new(page))
            .await?;
        Ok(PageResponse::new(list.data, page.page, page.limit, list.total))
    }

    /// Creates a script.
    pub async fn create(&self, input: &ScriptInput) -> Result<Script, ClientError> {
        let envelope: Envelope<Script> = self.client.post("/script/create", input).await?;
        Ok(envelope.into_inner())
    }

    /// Replaces a script's details.
    pub async fn update(&self, id: ScriptId, input: &ScriptInput) -> Result<Script, ClientError> {
        let envelope: Envelope<Script> = self
            .client
            .post("/script/update", &UpdateBody { id, input })
            .await?;
        Ok(envelope.into_inner())
    }

    /// Deletes a script.
    pub async fn delete(&self, id: ScriptId) -> Result<(), ClientError> {
        self.client.post_unit("/script/delete", &IdBody { id }).await
    }

    /// Daily closing prices for a chart symbol such as `TCS.NS`.
    pub async fn chart(&self, symbol: &str) -> Result<Vec<PricePoint>, ClientError> {
        let envelope: Envelope<Vec<PricePoint>> = self
            .client
            .get("/script/chart", &[("symbol", symbol)])
            .await?;
        Ok(envelope.into_inner())
    }

    /// Asks the upstream to refresh quotes from its market data source.
    ///
    /// The payload is passed through untouched.
    pub async fn fetch_stock_details(&self) -> Result<Vec<serde_json::Value>, ClientError> {
        let envelope: Envelope<Vec<serde_json::Value>> =
            self.client.post_empty("/script/fetch-stock-details").await?;
        Ok(envelope.into_inner())
    }
}
