//! Tradable scripts and their price history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sharedesk_shared::types::ScriptId;
use validator::Validate;

use crate::wire;

/// Exchange a script is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// National Stock Exchange.
    Nse,
    /// Bombay Stock Exchange.
    Bse,
}

impl Exchange {
    /// Ticker suffix used by the chart feed.
    #[must_use]
    pub const fn chart_suffix(self) -> &'static str {
        match self {
            Self::Nse => "NS",
            Self::Bse => "BO",
        }
    }
}

/// A script as listed by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Upstream identifier.
    pub id: ScriptId,
    /// Ticker name.
    pub name: String,
    /// Last traded price.
    #[serde(default, deserialize_with = "wire::optional_decimal")]
    pub current_rate: Option<Decimal>,
    /// Day high.
    #[serde(default, deserialize_with = "wire::optional_decimal")]
    pub high_value: Option<Decimal>,
    /// Day low.
    #[serde(default, deserialize_with = "wire::optional_decimal")]
    pub low_value: Option<Decimal>,
    /// Traded volume.
    #[serde(default, deserialize_with = "wire::optional_integer")]
    pub volume: Option<i64>,
    /// Previous close.
    #[serde(default, deserialize_with = "wire::optional_decimal")]
    pub closing_price: Option<Decimal>,
    /// Listing exchange.
    #[serde(rename = "type", default)]
    pub exchange: Option<Exchange>,
    /// Whether the script is active.
    #[serde(default, deserialize_with = "wire::flag")]
    pub status: bool,
}

impl Script {
    /// Symbol for the chart feed, e.g. `TCS.NS`.
    #[must_use]
    pub fn chart_symbol(&self) -> String {
        let exchange = self.exchange.unwrap_or(Exchange::Nse);
        format!(
            "{}.{}",
            self.name.trim().to_uppercase(),
            exchange.chart_suffix()
        )
    }
}

/// Payload for creating or updating a script.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScriptInput {
    /// Ticker name.
    #[validate(length(min = 1, max = 50, message = "Script name is required"))]
    pub name: String,
    /// Last traded price.
    pub current_rate: Decimal,
    /// Day high.
    pub high_value: Decimal,
    /// Day low.
    pub low_value: Decimal,
    /// Traded volume.
    #[validate(range(min = 0, message = "Volume cannot be negative"))]
    pub volume: i64,
    /// Previous close.
    pub closing_price: Decimal,
    /// Listing exchange.
    #[serde(rename = "type")]
    pub exchange: Exchange,
    /// Whether the script is active.
    #[serde(default = "default_active")]
    pub status: bool,
}

const fn default_active() -> bool {
    true
}

/// One point of a daily closing-price series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day as sent by the feed.
    pub date: String,
    /// Closing price.
    #[serde(deserialize_with = "wire::decimal")]
    pub close: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chart_symbol_suffix() {
        let mut script: Script = serde_json::from_str(
            r#"{"id": 1, "name": "tcs", "current_rate": "3500.50", "type": "BSE", "status": true}"#,
        )
        .unwrap();
        assert_eq!(script.current_rate, Some(dec!(3500.50)));
        assert_eq!(script.chart_symbol(), "TCS.BO");

        script.exchange = Some(Exchange::Nse);
        assert_eq!(script.chart_symbol(), "TCS.NS");
    }

    #[test]
    fn test_price_point_accepts_numbers() {
        let point: PricePoint =
            serde_json::from_str(r#"{"date": "2024-03-01", "close": 101.5}"#).unwrap();
        assert_eq!(point.close, dec!(101.5));
    }
}
