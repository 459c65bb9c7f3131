use std::cell::RefCell;

use sigex_eod::EodScheduler;
use sigex_execution::{BrokerAdapter, BrokerError, MarketOrderRequest};
use sigex_schemas::{BrokerAccount, BrokerOrder, BrokerPosition};

struct RecordingBroker {
    positions: Vec<BrokerPosition>,
    submitted: RefCell<Vec<MarketOrderRequest>>,
}

impl BrokerAdapter for RecordingBroker {
    fn submit_market_order(&self, req: &MarketOrderRequest) -> Result<BrokerOrder, BrokerError> {
        self.submitted.borrow_mut().push(req.clone());
        Ok(BrokerOrder {
            broker_order_id: format!("bo-{}", req.symbol),
            client_order_id: req.client_order_id.clone(),
            symbol: req.symbol.clone(),
            side: req.side.to_string(),
            status: "accepted".to_string(),
            qty: req.qty.to_string(),
            limit_price: None,
            stop_price: None,
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

/// A scheduler polled every minute through the flatten window must close
/// each open position exactly once, even though `run_if_due` is called
/// repeatedly while the window stays open.
#[test]
fn polling_every_minute_through_the_window_flattens_each_position_exactly_once() {
    let close_ts = 100_000;
    let broker = RecordingBroker {
        positions: vec![
            BrokerPosition { symbol: "AAPL".to_string(), qty: "100.000000".to_string(), avg_price: "190.000000".to_string() },
            BrokerPosition { symbol: "SOXS".to_string(), qty: "-40.000000".to_string(), avg_price: "12.000000".to_string() },
        ],
        submitted: RefCell::new(vec![]),
    };
    let mut scheduler = EodScheduler::new(broker);

    let mut all_attempts = Vec::new();
    let mut t = close_ts - 600;
    while t <= close_ts {
        all_attempts.extend(scheduler.run_if_due("2026-08-01", t, close_ts));
        t += 60;
    }

    assert_eq!(all_attempts.len(), 2);
}
