//! Loosely-typed records exchanged at the broker/quote-provider boundary.
//!
//! Quote providers and broker adapters hand back decimal-string prices and
//! provider-specific status strings. These types capture that boundary
//! verbatim; everything downstream of the boundary coerces into the strict
//! internal types in [`crate::domain`] and fails loudly on malformed data
//! rather than propagating an ambiguous string further into the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerOrder {
    pub broker_order_id: String,
    pub client_order_id: String,
    pub symbol: String,
    pub side: String,
    pub status: String,
    pub qty: String,
    pub limit_price: Option<String>,
    pub stop_price: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerFill {
    pub broker_fill_id: String,
    pub broker_order_id: String,
    pub client_order_id: String,
    pub symbol: String,
    pub side: String,
    pub qty: String,
    pub price: String,
    pub ts_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerPosition {
    pub symbol: String,
    pub qty: String,
    pub avg_price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerAccount {
    pub equity: String,
    pub cash: String,
    pub buying_power: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSnapshot {
    pub captured_at_utc: DateTime<Utc>,
    pub account: BrokerAccount,
    pub orders: Vec<BrokerOrder>,
    pub fills: Vec<BrokerFill>,
    pub positions: Vec<BrokerPosition>,
}

/// A raw OHLCV bar as returned verbatim by a quote provider.
///
/// Prices stay as decimal strings so callers normalize deterministically
/// into [`crate::domain::Bar`]'s integer-micros fields without introducing
/// rounding at the boundary itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBar {
    pub symbol: String,
    /// Bar end timestamp, UTC epoch seconds, 30s-aligned.
    pub end_ts: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: i64,
}

/// Parse a decimal price string into integer micros.
///
/// Rejects empty strings, non-numeric input, and more than six decimal
/// places (which would require rounding to represent exactly).
pub fn parse_price_micros(s: &str, field: &'static str) -> Result<i64, WireParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(WireParseError::Empty { field });
    }

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };

    let all_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    let int_ok = int_part.is_empty() || all_digits(int_part);
    let frac_ok = frac_part.is_empty() || all_digits(frac_part);
    if (int_part.is_empty() && frac_part.is_empty()) || !int_ok || !frac_ok {
        return Err(WireParseError::Invalid {
            field,
            raw: s.to_string(),
        });
    }
    if frac_part.len() > 6 {
        return Err(WireParseError::TooPrecise {
            field,
            raw: s.to_string(),
        });
    }

    let int_val: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| WireParseError::Invalid {
            field,
            raw: s.to_string(),
        })?
    };
    let mut frac_padded = frac_part.to_string();
    while frac_padded.len() < 6 {
        frac_padded.push('0');
    }
    let frac_val: i64 = frac_padded.parse().map_err(|_| WireParseError::Invalid {
        field,
        raw: s.to_string(),
    })?;

    let micros = int_val
        .checked_mul(1_000_000)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| WireParseError::Invalid {
            field,
            raw: s.to_string(),
        })?;

    Ok(if negative { -micros } else { micros })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireParseError {
    Empty { field: &'static str },
    Invalid { field: &'static str, raw: String },
    TooPrecise { field: &'static str, raw: String },
}

impl std::fmt::Display for WireParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireParseError::Empty { field } => write!(f, "field '{field}' is empty"),
            WireParseError::Invalid { field, raw } => {
                write!(f, "field '{field}' could not be parsed: '{raw}'")
            }
            WireParseError::TooPrecise { field, raw } => {
                write!(f, "field '{field}' has more than 6 decimal places: '{raw}'")
            }
        }
    }
}

impl std::error::Error for WireParseError {}
