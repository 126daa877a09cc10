//! Lenient decoding of upstream payloads.
//!
//! The upstream is loose with types: decimals arrive as strings or numbers,
//! flags as booleans, integers or words, and `position` may hold text such
//! as `"open"`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Error body; `message` is a string or a list of strings.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        match self.message {
            Some(serde_json::Value::String(text)) => Some(text),
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => self.error,
        }
    }
}

/// A single object, either bare or wrapped in `data` or `result`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Data { data: T },
    Result { result: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Data { data } | Self::Result { result: data } | Self::Bare(data) => data,
        }
    }
}

/// A list page as returned by the upstream.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub(crate) data: Vec<T>,
    #[serde(default, deserialize_with = "count")]
    pub(crate) total: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Loose {
    fn into_decimal(self) -> Option<Decimal> {
        match self {
            Self::Number(n) => parse_decimal(&n.to_string()),
            Self::Text(s) => parse_decimal(&s),
            Self::Bool(_) => None,
        }
    }

    fn into_i64(self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Required decimal, string or number.
pub(crate) fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Loose::deserialize(deserializer)?
        .into_decimal()
        .ok_or_else(|| de::Error::custom("expected a decimal"))
}

/// Optional decimal; anything unparseable becomes `None`.
pub(crate) fn optional_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    Ok(Option::<Loose>::deserialize(deserializer)?.and_then(Loose::into_decimal))
}

/// Required integer, string or number.
pub(crate) fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Loose::deserialize(deserializer)?
        .into_i64()
        .ok_or_else(|| de::Error::custom("expected an integer"))
}

/// Optional integer; anything unparseable becomes `None`.
pub(crate) fn optional_integer<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Loose>::deserialize(deserializer)?.and_then(Loose::into_i64))
}

/// Non-negative count; anything else reads as zero.
pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(optional_integer(deserializer)?
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0))
}

/// Active flag: `true`, `1`, `"1"`, `"true"` or `"active"`.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Bool(b)) => b,
        Some(Loose::Number(n)) => n.as_i64() == Some(1),
        Some(Loose::Text(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "active"
        ),
        None => false,
    })
}

/// Timestamp as RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or a bare date.
pub(crate) fn timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp {raw:?}")))
}

/// Optional timestamp; unparseable values become `None`.
pub(crate) fn optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
