//! Quote provider boundary.
//!
//! The provider itself (network access, vendor wire format) is an external
//! collaborator — out of scope here. This module defines only the trait and
//! the loosely-typed record it returns, so the ingestor can depend on an
//! interface rather than a vendor.

use std::fmt;

/// A single OHLCV bar as returned verbatim by an upstream quote provider.
///
/// Prices are kept as decimal strings so the normalizer can convert to
/// [`sigex_schemas::Micros`] deterministically, without floating-point
/// rounding at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBar {
    pub symbol: String,
    /// Bar end timestamp as UTC epoch seconds.
    pub end_ts: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: i64,
    pub spread_est: Option<String>,
}

/// A `{price, ts, spread_est?}` quote as returned by `get_last_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastPrice {
    pub price: String,
    pub ts: i64,
    pub spread_est: Option<String>,
}

/// Errors a [`QuoteProvider`] implementation may return.
#[derive(Debug)]
pub enum ProviderError {
    /// Network or transport failure.
    Transport(String),
    /// The upstream API returned an application-level error.
    Api { code: Option<i64>, message: String },
    /// A response payload could not be decoded.
    Decode(String),
    /// The provider returned zero rows for a requested symbol.
    Empty,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "transport error: {msg}"),
            ProviderError::Api {
                code: Some(c),
                message,
            } => write!(f, "provider api error code={c}: {message}"),
            ProviderError::Api {
                code: None,
                message,
            } => write!(f, "provider api error: {message}"),
            ProviderError::Decode(msg) => write!(f, "decode error: {msg}"),
            ProviderError::Empty => write!(f, "provider returned no data"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Upstream market-data provider contract (§6 Quote provider).
///
/// Implementations must be object-safe so the ingestor can hold a
/// `Box<dyn QuoteProvider>` without knowing the concrete vendor.
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Recent bars for `symbol` since `since_ts`, 30s aligned, in ascending
    /// `end_ts` order.
    fn get_bars(&self, symbol: &str, since_ts: i64) -> Result<Vec<RawBar>, ProviderError>;

    /// Most recent trade price for `symbol`.
    fn get_last_price(&self, symbol: &str) -> Result<LastPrice, ProviderError>;
}
