//! Share transactions.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use sharedesk_core::ledger::{LedgerKey, LedgerStore, ShareRecord, ShareTransaction, StoreError};
use sharedesk_shared::types::{PageRequest, PageResponse, ScriptId, ShareId, SortOrder, UserId};
use tracing::debug;

use super::IdBody;
use crate::client::ApiClient;
use crate::entities::share::{ShareRow, ShareWriteBody};
use crate::entities::{ShareListFilter, ShareListItem};
use crate::error::ClientError;
use crate::wire::{Envelope, ListEnvelope};

/// Share transaction CRUD and ledger lookups.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    client: ApiClient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareListBody<'a> {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<SortOrder>,
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
    #[serde(rename = "script_id", skip_serializing_if = "Option::is_none")]
    script_id: Option<ScriptId>,
    #[serde(rename = "start_date", skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
    #[serde(rename = "end_date", skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct LedgerBody {
    user_id: UserId,
    script_id: ScriptId,
}

impl ShareRepository {
    /// Creates a new share repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists one page of share transactions.
    pub async fn list(
        &self,
        page: &PageRequest,
        filter: &ShareListFilter,
    ) -> Result<PageResponse<ShareListItem>, ClientError> {
        let body = ShareListBody {
            page: page.page,
            limit: page.limit,
            search: page.search.as_deref(),
            sort_field: page.sort_field.as_deref(),
            sort_order: page.sort_order,
            user_id: filter.user_id,
            script_id: filter.script_id,
            start_date: filter.start_date,
            end_date: filter.end_date,
        };
        let list: ListEnvelope<ShareRow> = self.client.post("/share_data/list", &body).await?;
        let items = list
            .data
            .into_iter()
            .map(ShareRow::into_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResponse::new(items, page.page, page.limit, list.total))
    }

    /// Every transaction of one ledger, in upstream order.
    pub async fn find_by_ledger(&self, key: LedgerKey) -> Result<Vec<ShareTransaction>, ClientError> {
        let body = LedgerBody {
            user_id: key.user_id,
            script_id: key.script_id,
        };
        let rows: Envelope<Vec<ShareRow>> = self
            .client
            .post("/share_data/find-by-user-script", &body)
            .await?;
        let transactions = rows
            .into_inner()
            .into_iter()
            .map(ShareTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            user_id = %key.user_id,
            script_id = %key.script_id,
            count = transactions.len(),
            "Fetched ledger history"
        );
        Ok(transactions)
    }

    /// Stores a new transaction.
    pub async fn create(&self, record: &ShareRecord) -> Result<ShareTransaction, ClientError> {
        let row: Envelope<ShareRow> = self
            .client
            .post("/share_data/create", &ShareWriteBody::new(None, record))
            .await?;
        row.into_inner().try_into()
    }

    /// Replaces a stored transaction.
    pub async fn update(
        &self,
        id: ShareId,
        record: &ShareRecord,
    ) -> Result<ShareTransaction, ClientError> {
        let row: Envelope<ShareRow> = self
            .client
            .post("/share_data/update", &ShareWriteBody::new(Some(id), record))
            .await?;
        row.into_inner().try_into()
    }

    /// Deletes a transaction.
    pub async fn delete(&self, id: ShareId) -> Result<(), ClientError> {
        self.client
            .post_unit("/share_data/delete", &IdBody { id })
            .await
    }
}

#[async_trait]
impl LedgerStore for ShareRepository {
    async fn fetch_transactions_by_ledger(
        &self,
        key: LedgerKey,
    ) -> Result<Vec<ShareTransaction>, StoreError> {
        Ok(self.find_by_ledger(key).await?)
    }

    async fn create_transaction(
        &self,
        record: &ShareRecord,
    ) -> Result<ShareTransaction, StoreError> {
        Ok(self.create(record).await?)
    }

    async fn update_transaction(
        &self,
        id: ShareId,
        record: &ShareRecord,
    ) -> Result<ShareTransaction, StoreError> {
        Ok(self.update(id, record).await?)
    }
}
