//! History preview formatting.
//!
//! Turns a recomputed ledger into display rows: money rounded to two
//! decimals, dates localized, and a flag for rows whose stored derived
//! fields disagree with the recomputation.

use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use sharedesk_shared::config::DisplayConfig;
use sharedesk_shared::types::{ScriptId, ShareId, UserId, format_money, round_money};

use super::service::LedgerSnapshot;
use super::types::{LedgerRow, ShareTransaction, TradeType};

/// How dates are rendered in a preview.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    timezone: Tz,
    date_format: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl DisplayOptions {
    /// Creates options after checking the date pattern.
    pub fn new(timezone: Tz, date_format: impl Into<String>) -> Result<Self, String> {
        let date_format = date_format.into();
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("Invalid date format: {date_format}"));
        }
        Ok(Self {
            timezone,
            date_format,
        })
    }

    /// Builds options from the display configuration section.
    pub fn from_config(config: &DisplayConfig) -> Result<Self, String> {
        Self::new(config.tz()?, config.date_format.clone())
    }

    /// Time zone dates are rendered in.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    /// Transaction identifier.
    pub id: ShareId,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Units transacted.
    pub quantity: i64,
    /// Unit price.
    pub price: String,
    /// Recomputed average price.
    pub average_price: String,
    /// Recomputed realized profit/loss.
    pub profit_loss: String,
    /// Holding after the transaction.
    pub position: i64,
    /// Localized creation date.
    pub date: String,
    /// The stored history oversold at this row.
    pub oversold: bool,
    /// Stored derived fields differ from the recomputed ones.
    pub stored_drift: bool,
}

/// Formatted history of one ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPreview {
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script traded.
    pub script_id: ScriptId,
    /// Rows in chronological order.
    pub rows: Vec<PreviewRow>,
    /// Units that can still be sold.
    pub available_quantity: i64,
    /// Average cost of the live holding.
    pub average_price: String,
    /// Cost basis of the live holding.
    pub total_cost: String,
    /// Realized profit/loss over all sells.
    pub realized_profit_loss: String,
}

impl HistoryPreview {
    /// Formats a ledger snapshot.
    #[must_use]
    pub fn build(snapshot: &LedgerSnapshot, options: &DisplayOptions) -> Self {
        let state = &snapshot.state;
        let rows = state
            .rows
            .iter()
            .map(|row| {
                let stored = snapshot
                    .transactions
                    .iter()
                    .find(|t| t.id == row.transaction_id);
                PreviewRow {
                    id: row.transaction_id,
                    trade_type: row.trade_type,
                    quantity: row.quantity,
                    price: format_money(row.price),
                    average_price: format_money(row.average_price),
                    profit_loss: format_money(row.profit_loss),
                    position: row.position,
                    date: row
                        .created_at
                        .with_timezone(&options.timezone)
                        .format(&options.date_format)
                        .to_string(),
                    oversold: row.oversold,
                    stored_drift: stored.is_some_and(|t| has_drift(t, row)),
                }
            })
            .collect();

        Self {
            user_id: snapshot.key.user_id,
            script_id: snapshot.key.script_id,
            rows,
            available_quantity: state.available_quantity(),
            average_price: format_money(state.average_cost()),
            total_cost: format_money(state.holding.total_cost),
            realized_profit_loss: format_money(state.realized_profit_loss()),
        }
    }
}

/// Missing stored values count as agreement.
fn has_drift(stored: &ShareTransaction, row: &LedgerRow) -> bool {
    let money_differs = |value: Option<Decimal>, computed: Decimal| {
        value.is_some_and(|v| round_money(v) != round_money(computed))
    };

    money_differs(stored.average_price, row.average_price)
        || money_differs(stored.profit_loss, row.profit_loss)
        || stored.position.is_some_and(|p| p != row.position)
}
