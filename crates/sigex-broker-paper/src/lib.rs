//! Deterministic in-memory paper broker.
//!
//! Design decisions (kept intentionally simple/deterministic):
//! - `broker_order_id` is exactly `client_order_id`, so idempotency is
//!   visible in the id itself.
//! - Submitting the same `client_order_id` twice is a no-op: the existing
//!   snapshot is returned unchanged rather than filed again.
//! - No randomness in order identity or matching. The only non-determinism
//!   is `created_at_utc`, which the broker wire format requires as a real
//!   timestamp.
//! - Fills are not auto-generated; orders go straight to `Accepted` and
//!   stay there until a test or caller applies a position change directly.

use std::cell::RefCell;
use std::collections::BTreeMap;

use sigex_execution::{BrokerAdapter, BrokerError, MarketOrderRequest};
use sigex_schemas::{BrokerAccount, BrokerOrder, BrokerPosition};

#[derive(Debug)]
pub struct PaperBroker {
    orders: RefCell<BTreeMap<String, BrokerOrder>>,
    positions: RefCell<BTreeMap<String, i64>>,
    equity_micros: i64,
    cash_micros: i64,
}

impl Default for PaperBroker {
    fn default() -> Self {
        Self::new(100_000_000_000, 50_000_000_000)
    }
}

impl PaperBroker {
    pub fn new(equity_micros: i64, cash_micros: i64) -> Self {
        Self {
            orders: RefCell::new(BTreeMap::new()),
            positions: RefCell::new(BTreeMap::new()),
            equity_micros,
            cash_micros,
        }
    }

    /// Sets a position directly, for test setup or scenario wiring — this
    /// broker never fills an order into a position on its own.
    pub fn set_position(&self, symbol: impl Into<String>, qty_signed: i64) {
        self.positions.borrow_mut().insert(symbol.into(), qty_signed);
    }

    /// Deterministic listing: `BTreeMap` iteration order is stable.
    pub fn list_orders(&self) -> Vec<BrokerOrder> {
        self.orders.borrow().values().cloned().collect()
    }
}

impl BrokerAdapter for PaperBroker {
    fn submit_market_order(&self, req: &MarketOrderRequest) -> Result<BrokerOrder, BrokerError> {
        let broker_order_id = req.client_order_id.clone();

        if let Some(existing) = self.orders.borrow().get(&broker_order_id) {
            return Ok(existing.clone());
        }

        let order = BrokerOrder {
            broker_order_id: broker_order_id.clone(),
            client_order_id: req.client_order_id.clone(),
            symbol: req.symbol.clone(),
            side: req.side.to_string(),
            status: "accepted".to_string(),
            qty: req.qty.to_string(),
            limit_price: None,
            stop_price: req.stop_price.map(|p| p.to_string()),
            created_at_utc: chrono::Utc::now(),
        };

        self.orders.borrow_mut().insert(broker_order_id, order.clone());
        Ok(order)
    }

    fn cancel_order(&self, broker_order_id: &str) -> Result<(), BrokerError> {
        if let Some(order) = self.orders.borrow_mut().get_mut(broker_order_id) {
            order.status = "canceled".to_string();
            Ok(())
        } else {
            Err(BrokerError::Rejected(format!("unknown order {broker_order_id}")))
        }
    }

    fn get_positions(&self) -> Result<Vec<BrokerPosition>, BrokerError> {
        Ok(self
            .positions
            .borrow()
            .iter()
            .map(|(symbol, qty)| BrokerPosition {
                symbol: symbol.clone(),
                qty: format!("{qty}.000000"),
                avg_price: "0.000000".to_string(),
            })
            .collect())
    }

    fn get_account(&self) -> Result<BrokerAccount, BrokerError> {
        Ok(BrokerAccount {
            equity: micros_to_decimal(self.equity_micros),
            cash: micros_to_decimal(self.cash_micros),
            buying_power: micros_to_decimal(self.cash_micros),
            currency: "USD".to_string(),
        })
    }
}

fn micros_to_decimal(micros: i64) -> String {
    format!("{}.{:06}", micros / 1_000_000, (micros % 1_000_000).abs())
}
