//! A deterministic, in-memory `BrokerAdapter` for scenario assembly:
//! records every order it's asked to submit and serves a fixed position
//! list back, with no randomness or wall-clock dependency beyond the
//! `created_at_utc` timestamp the wire type requires.

use std::cell::RefCell;

use sigex_execution::{BrokerAdapter, BrokerError, MarketOrderRequest};
use sigex_schemas::{BrokerAccount, BrokerOrder, BrokerPosition};

#[derive(Default)]
pub struct RecordingBroker {
    positions: Vec<BrokerPosition>,
    submitted: RefCell<Vec<MarketOrderRequest>>,
}

impl RecordingBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positions(positions: Vec<BrokerPosition>) -> Self {
        Self {
            positions,
            submitted: RefCell::new(vec![]),
        }
    }

    pub fn submitted(&self) -> Vec<MarketOrderRequest> {
        self.submitted.borrow().clone()
    }
}

impl BrokerAdapter for RecordingBroker {
    fn submit_market_order(&self, req: &MarketOrderRequest) -> Result<BrokerOrder, BrokerError> {
        self.submitted.borrow_mut().push(req.clone());
        Ok(BrokerOrder {
            broker_order_id: format!("bo-{}", req.client_order_id),
            client_order_id: req.client_order_id.clone(),
            symbol: req.symbol.clone(),
            side: req.side.to_string(),
            status: "accepted".to_string(),
            qty: req.qty.to_string(),
            limit_price: None,
            stop_price: req.stop_price.map(|p| p.to_string()),
            created_at_utc: chrono::Utc::now(),
        })
    }

    fn cancel_order(&self, _broker_order_id: &str) -> Result<(), BrokerError> {
        Ok(())
    }

    fn get_positions(&self) -> Result<Vec<BrokerPosition>, BrokerError> {
        Ok(self.positions.clone())
    }

    fn get_account(&self) -> Result<BrokerAccount, BrokerError> {
        Ok(BrokerAccount {
            equity: "100000.000000".to_string(),
            cash: "50000.000000".to_string(),
            buying_power: "100000.000000".to_string(),
            currency: "USD".to_string(),
        })
    }
}
