use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sharedesk_shared::types::{ScriptId, UserId};

use super::*;
use crate::ledger::types::TradeType::{self, Buy, Sell};

/// In-memory store that yields between reading and writing so that
/// unserialized writers would interleave.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<ShareTransaction>>,
    fail_writes: bool,
}

impl MemoryStore {
    fn failing() -> Self {
        Self {
            rows: Mutex::default(),
            fail_writes: true,
        }
    }

    fn rows(&self) -> Vec<ShareTransaction> {
        self.rows.lock().unwrap().clone()
    }

    fn to_transaction(id: i64, record: &ShareRecord, minutes: i64) -> ShareTransaction {
        ShareTransaction {
            id: ShareId::new(id),
            user_id: record.user_id,
            script_id: record.script_id,
            trade_type: record.trade_type,
            quantity: record.quantity,
            price: record.price,
            created_at: Utc::now() + TimeDelta::minutes(minutes),
            updated_at: None,
            average_price: Some(record.average_price),
            profit_loss: Some(record.profit_loss),
            position: Some(record.position),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn fetch_transactions_by_ledger(
        &self,
        key: LedgerKey,
    ) -> Result<Vec<ShareTransaction>, StoreError> {
        let rows = self
            .rows()
            .into_iter()
            .filter(|t| t.ledger_key() == key)
            .collect();
        tokio::time::sleep(Duration::from_millis(2)).await;
        Ok(rows)
    }

    async fn create_transaction(
        &self,
        record: &ShareRecord,
    ) -> Result<ShareTransaction, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
        let mut rows = self.rows.lock().unwrap();
        let next = i64::try_from(rows.len()).unwrap() + 1;
        let transaction = Self::to_transaction(next, record, next);
        rows.push(transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        id: ShareId,
        record: &ShareRecord,
    ) -> Result<ShareTransaction, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("share {id}")))?;
        let created_at = slot.created_at;
        *slot = Self::to_transaction(id.into_inner(), record, 0);
        slot.created_at = created_at;
        slot.updated_at = Some(Utc::now());
        Ok(slot.clone())
    }
}

fn input(trade_type: TradeType, quantity: i64, price: Decimal) -> ShareInput {
    ShareInput {
        user_id: UserId::new(1),
        script_id: ScriptId::new(7),
        trade_type,
        quantity,
        price,
    }
}

fn key() -> LedgerKey {
    LedgerKey::new(UserId::new(1), ScriptId::new(7))
}

#[tokio::test]
async fn test_create_flow_scenarios() {
    let store = MemoryStore::default();
    let service = LedgerService::new();

    let a = service.create(&store, &input(Buy, 10, dec!(100))).await.unwrap();
    assert_eq!(a.transaction.average_price, Some(dec!(100)));
    assert_eq!(a.transaction.position, Some(10));

    let b = service.create(&store, &input(Buy, 10, dec!(200))).await.unwrap();
    assert_eq!(b.plan.average_price, dec!(150));
    assert_eq!(b.plan.position, 20);

    let c = service.create(&store, &input(Sell, 5, dec!(180))).await.unwrap();
    assert_eq!(c.transaction.average_price, Some(dec!(150)));
    assert_eq!(c.transaction.profit_loss, Some(dec!(150)));
    assert_eq!(c.transaction.position, Some(15));

    let d = service.create(&store, &input(Sell, 20, dec!(180))).await;
    assert!(matches!(
        d,
        Err(LedgerError::InsufficientHolding {
            available: 15,
            requested: 20
        })
    ));
    assert_eq!(store.rows().len(), 3);
}

#[tokio::test]
async fn test_sell_on_empty_ledger_never_written() {
    let store = MemoryStore::default();
    let err = LedgerService::new()
        .create(&store, &input(Sell, 5, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientHolding { available: 0, .. }));
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn test_invalid_input_rejected() {
    let store = MemoryStore::default();
    let err = LedgerService::new()
        .create(&store, &input(Buy, 0, dec!(10)))
        .await
        .unwrap_err();
    assert_eq!(err.http_status_code(), 400);
}

#[tokio::test]
async fn test_store_failure_surfaces_unavailable() {
    let store = MemoryStore::failing();
    let err = LedgerService::new()
        .create(&store, &input(Buy, 1, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::CollaboratorUnavailable(_)));
}

#[tokio::test]
async fn test_update_recomputes_against_rest_of_ledger() {
    let store = MemoryStore::default();
    let service = LedgerService::new();
    service.create(&store, &input(Buy, 10, dec!(100))).await.unwrap();
    let second = service.create(&store, &input(Buy, 10, dec!(200))).await.unwrap();

    let updated = service
        .update(&store, second.transaction.id, &input(Buy, 30, dec!(300)))
        .await
        .unwrap();
    assert_eq!(updated.plan.available_quantity, 10);
    assert_eq!(updated.plan.average_price, dec!(250));
    assert_eq!(updated.transaction.position, Some(40));
    assert!(updated.transaction.updated_at.is_some());
}

#[tokio::test]
async fn test_update_rejects_oversell_and_unknown_id() {
    let store = MemoryStore::default();
    let service = LedgerService::new();
    let only = service.create(&store, &input(Buy, 10, dec!(100))).await.unwrap();

    let err = service
        .update(&store, only.transaction.id, &input(Sell, 1, dec!(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientHolding { available: 0, requested: 1 }));

    let err = service
        .update(&store, ShareId::new(404), &input(Buy, 1, dec!(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(_)));
}

#[tokio::test]
async fn test_update_cannot_strand_later_sell() {
    let store = MemoryStore::default();
    let service = LedgerService::new();
    let buy = service.create(&store, &input(Buy, 10, dec!(100))).await.unwrap();
    service.create(&store, &input(Sell, 8, dec!(120))).await.unwrap();
    let before = store.rows();

    let err = service
        .update(&store, buy.transaction.id, &input(Buy, 1, dec!(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientHolding { available: 1, requested: 8 }));
    assert_eq!(err.http_status_code(), 422);

    assert_eq!(store.rows(), before);
    let snapshot = service.preview(&store, key()).await.unwrap();
    assert!(!snapshot.state.has_oversell());
    assert_eq!(snapshot.state.available_quantity(), 2);
}

#[tokio::test]
async fn test_amounts_beyond_ceiling_rejected_without_write() {
    let store = MemoryStore::default();
    let err = LedgerService::new()
        .create(&store, &input(Buy, 1000, Decimal::MAX))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidTransaction(TransactionValidationError::PriceTooLarge(_))
    ));
    assert_eq!(err.http_status_code(), 400);
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn test_idle_locks_are_pruned_after_writes() {
    let store = MemoryStore::default();
    let service = LedgerService::with_locks(Arc::new(LedgerLocks::with_idle_limit(2)));

    for user in 1..=5 {
        let buy = ShareInput {
            user_id: UserId::new(user),
            ..input(Buy, 1, dec!(10))
        };
        service.create(&store, &buy).await.unwrap();
        assert!(service.locks().len() <= 2);
    }
    assert_eq!(store.rows().len(), 5);
}

#[tokio::test]
async fn test_preview_and_plan_do_not_write() {
    let store = MemoryStore::default();
    let service = LedgerService::new();
    service.create(&store, &input(Buy, 10, dec!(100))).await.unwrap();

    let snapshot = service.preview(&store, key()).await.unwrap();
    assert_eq!(snapshot.state.available_quantity(), 10);
    assert_eq!(snapshot.transactions.len(), 1);

    let candidate = TradeCandidate {
        trade_type: Sell,
        quantity: 11,
        price: dec!(120),
    };
    let plan = service.plan(&store, key(), &candidate, None).await.unwrap();
    assert!(!plan.feasible);
    assert_eq!(plan.available_quantity, 10);
    assert_eq!(store.rows().len(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_are_serialized() {
    let store = MemoryStore::default();
    let service = LedgerService::new();

    let buy = input(Buy, 1, dec!(10));
    let writes = (0..8).map(|_| service.create(&store, &buy));
    let results = join_all(writes).await;

    let mut positions: Vec<i64> = results
        .into_iter()
        .map(|r| r.unwrap().plan.position)
        .collect();
    positions.sort_unstable();
    assert_eq!(positions, (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_concurrent_sells_cannot_both_spend_holding() {
    let store = MemoryStore::default();
    let service = LedgerService::new();
    service.create(&store, &input(Buy, 5, dec!(10))).await.unwrap();

    let sell = input(Sell, 5, dec!(12));
    let first = service.create(&store, &sell);
    let second = service.create(&store, &sell);
    let (first, second) = tokio::join!(first, second);

    assert_eq!(u8::from(first.is_ok()) + u8::from(second.is_ok()), 1);
    let snapshot = service.preview(&store, key()).await.unwrap();
    assert_eq!(snapshot.state.available_quantity(), 0);
    assert!(!snapshot.state.has_oversell());
}
