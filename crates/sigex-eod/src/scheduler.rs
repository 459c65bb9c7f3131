//! Wires the flattener's planning step to a live broker adapter, the same
//! narrow composition the dispatcher uses: plan first, then submit one
//! request per planned order, stopping at whatever the broker reports
//! rather than retrying (a flatten is re-attempted on the next tick, not
//! mid-call, since the flattener already treats re-planning as safe).

use sigex_execution::{BrokerAdapter, BrokerError, MarketOrderRequest};

use crate::flattener::{EodFlattener, FlattenOrder};

pub const EOD_FLATTEN_MINUTES: i64 = 10;
pub const OPG_CLEANUP_MINUTES_BEFORE_OPEN: i64 = 5;
pub const OPG_CLEANUP_MINUTES_AFTER_OPEN: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum FlattenAttempt {
    Submitted { symbol: String },
    Failed { symbol: String, error: BrokerError },
}

pub struct EodScheduler<B: BrokerAdapter> {
    broker: B,
    flattener: EodFlattener,
}

impl<B: BrokerAdapter> EodScheduler<B> {
    pub fn new(broker: B) -> Self {
        Self {
            broker,
            flattener: EodFlattener::new(),
        }
    }

    /// Runs one flatten pass if `now` is inside the flatten window,
    /// otherwise does nothing. Safe to call on every scheduler tick.
    pub fn run_if_due(&mut self, window_key: &str, now: i64, close_ts: i64) -> Vec<FlattenAttempt> {
        if !EodFlattener::is_in_flatten_window(now, close_ts, EOD_FLATTEN_MINUTES) {
            return Vec::new();
        }
        self.run(window_key)
    }

    /// `true` when `now` is inside the opening-auction cleanup window.
    /// The cleanup window itself has no orders of its own here; it marks
    /// when a caller should clear any resting open-on-open instructions
    /// left over from the prior session.
    pub fn is_opg_cleanup_due(now: i64, open_ts: i64) -> bool {
        EodFlattener::is_in_opg_cleanup_window(
            now,
            open_ts,
            OPG_CLEANUP_MINUTES_BEFORE_OPEN,
            OPG_CLEANUP_MINUTES_AFTER_OPEN,
        )
    }

    fn run(&mut self, window_key: &str) -> Vec<FlattenAttempt> {
        let positions = match self.broker.get_positions() {
            Ok(positions) => positions,
            Err(_) => return Vec::new(),
        };

        let orders = self.flattener.plan_flatten(window_key, &positions);
        orders
            .into_iter()
            .map(|order| self.submit(window_key, order))
            .collect()
    }

    fn submit(&self, window_key: &str, order: FlattenOrder) -> FlattenAttempt {
        let FlattenOrder { symbol, side, qty } = order;
        let req = MarketOrderRequest {
            client_order_id: format!("eod-{window_key}-{symbol}"),
            symbol: symbol.clone(),
            side,
            qty,
            stop_price: None,
            target_price: None,
        };
        match self.broker.submit_market_order(&req) {
            Ok(_) => FlattenAttempt::Submitted { symbol },
            Err(error) => FlattenAttempt::Failed { symbol, error },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use sigex_schemas::{BrokerAccount, BrokerOrder, BrokerPosition, Side};

    use super::*;

    struct FakeBroker {
        positions: Vec<BrokerPosition>,
        submitted: RefCell<Vec<MarketOrderRequest>>,
    }

    impl BrokerAdapter for FakeBroker {
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

    fn position(symbol: &str, qty: &str) -> BrokerPosition {
        BrokerPosition {
            symbol: symbol.to_string(),
            qty: qty.to_string(),
            avg_price: "100.000000".to_string(),
        }
    }

    #[test]
    fn outside_the_flatten_window_nothing_runs() {
        let broker = FakeBroker { positions: vec![position("AAPL", "10.000000")], submitted: RefCell::new(vec![]) };
        let mut scheduler = EodScheduler::new(broker);
        let attempts = scheduler.run_if_due("2026-08-01", 0, 100_000);
        assert!(attempts.is_empty());
    }

    #[test]
    fn inside_the_flatten_window_open_positions_are_closed() {
        let close_ts = 100_000;
        let broker = FakeBroker { positions: vec![position("AAPL", "10.000000")], submitted: RefCell::new(vec![]) };
        let mut scheduler = EodScheduler::new(broker);
        let now = close_ts - 60;
        let attempts = scheduler.run_if_due("2026-08-01", now, close_ts);
        assert_eq!(attempts, vec![FlattenAttempt::Submitted { symbol: "AAPL".into() }]);
    }

    #[test]
    fn a_second_tick_in_the_same_window_does_not_resubmit() {
        let close_ts = 100_000;
        let broker = FakeBroker { positions: vec![position("AAPL", "10.000000")], submitted: RefCell::new(vec![]) };
        let mut scheduler = EodScheduler::new(broker);
        let now = close_ts - 60;
        scheduler.run_if_due("2026-08-01", now, close_ts);
        let second = scheduler.run_if_due("2026-08-01", now + 1, close_ts);
        assert!(second.is_empty());
    }

    #[test]
    fn opg_cleanup_window_is_detected_independent_of_flatten_window() {
        let open_ts = 900_000;
        assert!(!EodScheduler::<FakeBroker>::is_opg_cleanup_due(open_ts - 1000, open_ts));
        assert!(EodScheduler::<FakeBroker>::is_opg_cleanup_due(open_ts, open_ts));
    }
}
