//! Share transactions in the upstream wire format.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sharedesk_core::ledger::{ShareRecord, ShareTransaction, TradeType};
use sharedesk_shared::types::{ScriptId, ShareId, UserId};

use crate::error::ClientError;
use crate::wire;

/// Id and name of a related user or script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Upstream identifier.
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A share row as sent by the upstream.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ShareRow {
    #[serde(deserialize_with = "wire::integer")]
    id: i64,
    #[serde(default, deserialize_with = "wire::optional_integer")]
    user_id: Option<i64>,
    #[serde(default, deserialize_with = "wire::optional_integer")]
    script_id: Option<i64>,
    #[serde(default)]
    user: Option<NamedRef>,
    #[serde(default)]
    script: Option<NamedRef>,
    #[serde(deserialize_with = "wire::integer")]
    qty: i64,
    #[serde(rename = "type")]
    trade_type: String,
    #[serde(deserialize_with = "wire::decimal")]
    price: Decimal,
    #[serde(rename = "avgPrice", default, deserialize_with = "wire::optional_decimal")]
    avg_price: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::optional_decimal")]
    profit_loss: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::optional_integer")]
    position: Option<i64>,
    #[serde(deserialize_with = "wire::timestamp")]
    create_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    updated_date: Option<DateTime<Utc>>,
}

impl ShareRow {
    /// Converts the row, keeping the related names.
    pub(crate) fn into_item(self) -> Result<ShareListItem, ClientError> {
        let user = self.user.clone();
        let script = self.script.clone();
        Ok(ShareListItem {
            transaction: self.try_into()?,
            user,
            script,
        })
    }
}

impl TryFrom<ShareRow> for ShareTransaction {
    type Error = ClientError;

    fn try_from(row: ShareRow) -> Result<Self, Self::Error> {
        let user_id = row
            .user_id
            .or_else(|| row.user.as_ref().map(|u| u.id))
            .ok_or_else(|| ClientError::Decode(format!("share {} has no user", row.id)))?;
        let script_id = row
            .script_id
            .or_else(|| row.script.as_ref().map(|s| s.id))
            .ok_or_else(|| ClientError::Decode(format!("share {} has no script", row.id)))?;
        let trade_type: TradeType = row.trade_type.parse()?;

        Ok(Self {
            id: ShareId::new(row.id),
            user_id: UserId::new(user_id),
            script_id: ScriptId::new(script_id),
            trade_type,
            quantity: row.qty,
            price: row.price,
            created_at: row.create_date,
            updated_at: row.updated_date,
            average_price: row.avg_price,
            profit_loss: row.profit_loss,
            position: row.position,
        })
    }
}

/// Body of the share create and update calls.
#[derive(Debug, Serialize)]
pub(crate) struct ShareWriteBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<ShareId>,
    user_id: UserId,
    script_id: ScriptId,
    qty: i64,
    #[serde(rename = "type")]
    trade_type: TradeType,
    price: Decimal,
    #[serde(rename = "avgPrice")]
    avg_price: Decimal,
    profit_loss: Decimal,
    position: i64,
}

impl ShareWriteBody {
    pub(crate) const fn new(id: Option<ShareId>, record: &ShareRecord) -> Self {
        Self {
            id,
            user_id: record.user_id,
            script_id: record.script_id,
            qty: record.quantity,
            trade_type: record.trade_type,
            price: record.price,
            avg_price: record.average_price,
            profit_loss: record.profit_loss,
            position: record.position,
        }
    }
}

/// A share transaction with the names of its user and script.
#[derive(Debug, Clone, Serialize)]
pub struct ShareListItem {
    /// The transaction.
    #[serde(flatten)]
    pub transaction: ShareTransaction,
    /// Related user, when the upstream embeds it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
    /// Related script, when the upstream embeds it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<NamedRef>,
}

/// Filters for the share list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareListFilter {
    /// Only this user's transactions.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Only this script's transactions.
    #[serde(default)]
    pub script_id: Option<ScriptId>,
    /// First day included.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day included.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nested_row_decodes() {
        let row: ShareRow = serde_json::from_str(
            r#"{
                "id": 31, "user": {"id": 2, "name": "Asha"}, "script": {"id": 9, "name": "TCS"},
                "qty": 5, "type": "sell", "price": "180.00", "avgPrice": 150,
                "profit_loss": "150.00", "position": "open",
                "create_date": "2024-03-01T09:30:00.000Z", "updated_date": null
            }"#,
        )
        .unwrap();
        let item = row.into_item().unwrap();
        let tx = &item.transaction;
        assert_eq!(tx.user_id, UserId::new(2));
        assert_eq!(tx.script_id, ScriptId::new(9));
        assert_eq!(tx.trade_type, TradeType::Sell);
        assert_eq!(tx.price, dec!(180.00));
        assert_eq!(tx.average_price, Some(dec!(150)));
        assert_eq!(tx.position, None);
        assert_eq!(item.script.and_then(|s| s.name).as_deref(), Some("TCS"));
    }

    #[test]
    fn test_unknown_type_is_invalid_record() {
        let row: ShareRow = serde_json::from_str(
            r#"{"id": 1, "user_id": 1, "script_id": 1, "qty": 1, "type": "hold",
                "price": 1, "create_date": "2024-03-01 09:30:00"}"#,
        )
        .unwrap();
        let err = ShareTransaction::try_from(row).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRecord(_)));
    }

    #[test]
    fn test_write_body_uses_upstream_names() {
        let record = ShareRecord {
            user_id: UserId::new(1),
            script_id: ScriptId::new(2),
            trade_type: TradeType::Buy,
            quantity: 10,
            price: dec!(100),
            average_price: dec!(100),
            profit_loss: dec!(0),
            position: 10,
        };
        let json = serde_json::to_value(ShareWriteBody::new(Some(ShareId::new(7)), &record)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["qty"], 10);
        assert_eq!(json["type"], "buy");
        assert_eq!(json["avgPrice"], "100");
        assert_eq!(json["position"], 10);
    }
}
