//! Converts provider [`RawBar`]s into the strict internal [`Bar`] type.
//!
//! Price strings are converted to [`Micros`] via
//! [`sigex_schemas::parse_price_micros`] — no floating point at any stage —
//! and the result is run through [`Bar::validate`] so a malformed upstream
//! record fails loudly here rather than corrupting the rolling window.

use sigex_schemas::{parse_price_micros, Bar, BarError, Micros, WireParseError};
use std::fmt;

use crate::provider::RawBar;

#[derive(Debug)]
pub enum NormalizeError {
    Price(WireParseError),
    Invariant(BarError),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::Price(e) => write!(f, "{e}"),
            NormalizeError::Invariant(e) => write!(f, "{e:?}"),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Normalize a single [`RawBar`] into a [`Bar`], rounding `end_ts` down to
/// its 30-second boundary before constructing it.
pub fn normalize(raw: &RawBar) -> Result<Bar, NormalizeError> {
    let open = Micros::new(parse_price_micros(&raw.open, "open").map_err(NormalizeError::Price)?);
    let high = Micros::new(parse_price_micros(&raw.high, "high").map_err(NormalizeError::Price)?);
    let low = Micros::new(parse_price_micros(&raw.low, "low").map_err(NormalizeError::Price)?);
    let close = Micros::new(parse_price_micros(&raw.close, "close").map_err(NormalizeError::Price)?);
    let spread_est = raw
        .spread_est
        .as_deref()
        .map(|s| parse_price_micros(s, "spread_est").map(Micros::new))
        .transpose()
        .map_err(NormalizeError::Price)?;

    let ts = Bar::align_ts(raw.end_ts);
    let bar = Bar {
        ts,
        open,
        high,
        low,
        close,
        volume: raw.volume,
        spread_est,
    };
    bar.validate().map_err(NormalizeError::Invariant)?;
    Ok(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(end_ts: i64, o: &str, h: &str, l: &str, c: &str, v: i64) -> RawBar {
        RawBar {
            symbol: "AAPL".to_string(),
            end_ts,
            open: o.to_string(),
            high: h.to_string(),
            low: l.to_string(),
            close: c.to_string(),
            volume: v,
            spread_est: None,
        }
    }

    #[test]
    fn normalize_happy_path_rounds_ts_to_alignment() {
        let bar = normalize(&raw(1_700_000_007, "100.00", "105.00", "99.00", "103.00", 1_000))
            .unwrap();
        assert_eq!(bar.ts, 1_700_000_007 / 30 * 30);
        assert_eq!(bar.open.raw(), 100_000_000);
        assert_eq!(bar.close.raw(), 103_000_000);
    }

    #[test]
    fn normalize_rejects_ohlc_violation() {
        let err = normalize(&raw(30, "100", "99", "101", "100", 0)).unwrap_err();
        assert!(matches!(err, NormalizeError::Invariant(_)));
    }

    #[test]
    fn normalize_rejects_unparseable_price() {
        let err = normalize(&raw(30, "NaN", "105", "99", "103", 0)).unwrap_err();
        assert!(matches!(err, NormalizeError::Price(_)));
    }

    #[test]
    fn normalize_carries_spread_est_when_present() {
        let mut r = raw(30, "100", "105", "99", "103", 0);
        r.spread_est = Some("0.05".to_string());
        let bar = normalize(&r).unwrap();
        assert_eq!(bar.spread_est, Some(Micros::new(50_000)));
    }
}
