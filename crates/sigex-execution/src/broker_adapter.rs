//! Broker-agnostic boundary the dispatcher submits through.
//!
//! Mirrors the router/adapter split the order router pattern is grounded
//! on: a thin, deterministic request/response shape here, with all
//! broker-specific wire handling left to the implementor.

use sigex_schemas::{BrokerAccount, BrokerOrder, BrokerPosition, Micros, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct MarketOrderRequest {
    pub client_order_id: String,
    pub symbol: String,
    pub side: Side,
    pub qty: i64,
    pub stop_price: Option<Micros>,
    pub target_price: Option<Micros>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrokerError {
    /// Retryable: network blip, rate limit, 5xx. The dispatcher backs off
    /// and retries.
    Transient(String),
    /// Not retryable within the current session; queue-or-abandon applies.
    MarketClosed,
    /// Broker refused the order outright (bad symbol, insufficient buying
    /// power, etc). Not retried.
    Rejected(String),
}

impl std::fmt::Display for BrokerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrokerError::Transient(msg) => write!(f, "transient broker error: {msg}"),
            BrokerError::MarketClosed => write!(f, "market closed"),
            BrokerError::Rejected(msg) => write!(f, "broker rejected order: {msg}"),
        }
    }
}

impl std::error::Error for BrokerError {}

/// The external broker collaborator. Implementors own all wire-format and
/// auth concerns; this trait only fixes the shape callers depend on.
pub trait BrokerAdapter {
    fn submit_market_order(&self, req: &MarketOrderRequest) -> Result<BrokerOrder, BrokerError>;
    fn cancel_order(&self, broker_order_id: &str) -> Result<(), BrokerError>;
    fn get_positions(&self) -> Result<Vec<BrokerPosition>, BrokerError>;
    fn get_account(&self) -> Result<BrokerAccount, BrokerError>;
}
