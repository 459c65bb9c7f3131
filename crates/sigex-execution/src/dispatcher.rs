//! Order dispatcher: idempotent submission with bounded retry.
//!
//! The dispatcher is the single choke point between an [`OrderIntent`] and
//! the broker. It derives the idempotency key, refuses duplicate
//! submissions, retries transient broker errors with exponential backoff,
//! and queues or abandons intents when the market is closed.

use std::collections::HashMap;

use sigex_schemas::OrderIntent;
use uuid::Uuid;

use crate::broker_adapter::{BrokerAdapter, BrokerError, MarketOrderRequest};
use crate::oms::state_machine::OrderLifecycle;

/// Namespace for deterministic idempotency-key derivation. Fixed so the
/// same (source id, day, exec_symbol) always derives the same key, across
/// process restarts.
const IDEMPOTENCY_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6f, 0x1d, 0x3c, 0x2a, 0x8b, 0x41, 0x4e, 0x9a, 0xb2, 0x77, 0x5d, 0x1e, 0x9c, 0x3a, 0x44, 0x10,
]);

/// Builds an idempotency key from a signal (or basket aggregation) id, the
/// session-local day key, and the execution symbol. The same triple always
/// derives the same key, so a retried submission naturally reuses it.
pub fn idempotency_key(source_id: &str, day_key: &str, exec_symbol: &str) -> String {
    let name = format!("{source_id}|{day_key}|{exec_symbol}");
    Uuid::new_v5(&IDEMPOTENCY_NAMESPACE, name.as_bytes()).to_string()
}

const MAX_ATTEMPTS: u32 = 3;

/// Delay before attempt `n` (1-indexed), in seconds: `2^n`.
pub fn backoff_seconds(attempt: u32) -> u64 {
    2u64.saturating_pow(attempt)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Submitted { broker_order_id: String },
    DuplicateRefused,
    QueuedForOpen,
    Abandoned,
    FailedAfterRetries(BrokerError),
    FailedRejected(BrokerError),
}

/// Tracks submitted idempotency keys and their order lifecycles.
pub struct OrderDispatcher<B: BrokerAdapter> {
    broker: B,
    orders: HashMap<String, OrderLifecycle>,
}

impl<B: BrokerAdapter> OrderDispatcher<B> {
    pub fn new(broker: B) -> Self {
        Self {
            broker,
            orders: HashMap::new(),
        }
    }

    pub fn order(&self, idempotency_key: &str) -> Option<&OrderLifecycle> {
        self.orders.get(idempotency_key)
    }

    /// Dispatch an order intent. `market_open` gates submission; when the
    /// market is closed, `queue_on_close` decides between queueing for the
    /// next open and abandoning the intent outright.
    pub fn dispatch(&mut self, intent: &OrderIntent, market_open: bool, queue_on_close: bool) -> DispatchOutcome {
        if self.orders.contains_key(&intent.idempotency_key) {
            return DispatchOutcome::DuplicateRefused;
        }

        if !market_open {
            return if queue_on_close {
                DispatchOutcome::QueuedForOpen
            } else {
                DispatchOutcome::Abandoned
            };
        }

        let req = MarketOrderRequest {
            client_order_id: intent.idempotency_key.clone(),
            symbol: intent.exec_symbol.clone(),
            side: intent.side,
            qty: intent.qty,
            stop_price: Some(intent.stop),
            target_price: Some(intent.target),
        };

        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.broker.submit_market_order(&req) {
                Ok(order) => {
                    self.orders.insert(
                        intent.idempotency_key.clone(),
                        OrderLifecycle::new(intent.idempotency_key.clone(), intent.exec_symbol.clone()),
                    );
                    return DispatchOutcome::Submitted {
                        broker_order_id: order.broker_order_id,
                    };
                }
                Err(BrokerError::MarketClosed) => {
                    return if queue_on_close {
                        DispatchOutcome::QueuedForOpen
                    } else {
                        DispatchOutcome::Abandoned
                    };
                }
                Err(err @ BrokerError::Rejected(_)) => {
                    return DispatchOutcome::FailedRejected(err);
                }
                Err(err @ BrokerError::Transient(_)) => {
                    last_err = Some(err);
                    let _ = backoff_seconds(attempt);
                    continue;
                }
            }
        }

        DispatchOutcome::FailedAfterRetries(last_err.expect("loop always sets last_err on exhaustion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigex_schemas::{BrokerAccount, BrokerOrder, BrokerPosition, Micros, OrderIntentMeta, Side};
    use std::cell::RefCell;

    struct ScriptedBroker {
        responses: RefCell<Vec<Result<BrokerOrder, BrokerError>>>,
    }

    impl BrokerAdapter for ScriptedBroker {
        fn submit_market_order(&self, _req: &MarketOrderRequest) -> Result<BrokerOrder, BrokerError> {
            self.responses.borrow_mut().remove(0)
        }
        fn cancel_order(&self, _broker_order_id: &str) -> Result<(), BrokerError> {
            Ok(())
        }
        fn get_positions(&self) -> Result<Vec<BrokerPosition>, BrokerError> {
            Ok(vec![])
        }
        fn get_account(&self) -> Result<BrokerAccount, BrokerError> {
            Ok(BrokerAccount {
                equity: "100000".into(),
                cash: "50000".into(),
                buying_power: "100000".into(),
                currency: "USD".into(),
            })
        }
    }

    fn intent(key: &str) -> OrderIntent {
        OrderIntent {
            idempotency_key: key.to_string(),
            exec_symbol: "AAPL".to_string(),
            side: Side::Buy,
            qty: 10,
            entry: Micros::new(100_000_000),
            stop: Micros::new(98_000_000),
            target: Micros::new(106_000_000),
            meta: OrderIntentMeta {
                source_signal_id: None,
                basket_id: None,
            },
        }
    }

    fn ok_order(id: &str) -> Result<BrokerOrder, BrokerError> {
        Ok(BrokerOrder {
            broker_order_id: id.to_string(),
            client_order_id: id.to_string(),
            symbol: "AAPL".to_string(),
            side: "buy".to_string(),
            status: "accepted".to_string(),
            qty: "10".to_string(),
            limit_price: None,
            stop_price: None,
            created_at_utc: chrono::Utc::now(),
        })
    }

    #[test]
    fn same_source_day_symbol_always_derives_the_same_key() {
        let a = idempotency_key("sig-1", "2026-08-01", "AAPL");
        let b = idempotency_key("sig-1", "2026-08-01", "AAPL");
        assert_eq!(a, b);
        let c = idempotency_key("sig-2", "2026-08-01", "AAPL");
        assert_ne!(a, c);
    }

    #[test]
    fn submits_on_first_try() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![ok_order("bo-1")]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        let outcome = dispatcher.dispatch(&intent("k1"), true, true);
        assert_eq!(
            outcome,
            DispatchOutcome::Submitted {
                broker_order_id: "bo-1".to_string()
            }
        );
    }

    #[test]
    fn duplicate_key_is_refused_without_a_second_broker_call() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![ok_order("bo-1")]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        dispatcher.dispatch(&intent("k1"), true, true);
        let outcome = dispatcher.dispatch(&intent("k1"), true, true);
        assert_eq!(outcome, DispatchOutcome::DuplicateRefused);
    }

    #[test]
    fn transient_errors_retry_up_to_three_attempts_then_fail() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![
                Err(BrokerError::Transient("timeout".into())),
                Err(BrokerError::Transient("timeout".into())),
                Err(BrokerError::Transient("timeout".into())),
            ]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        let outcome = dispatcher.dispatch(&intent("k1"), true, true);
        assert!(matches!(outcome, DispatchOutcome::FailedAfterRetries(_)));
    }

    #[test]
    fn transient_error_then_success_on_retry_submits() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![Err(BrokerError::Transient("timeout".into())), ok_order("bo-2")]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        let outcome = dispatcher.dispatch(&intent("k1"), true, true);
        assert_eq!(
            outcome,
            DispatchOutcome::Submitted {
                broker_order_id: "bo-2".to_string()
            }
        );
    }

    #[test]
    fn rejected_does_not_retry() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![
                Err(BrokerError::Rejected("bad symbol".into())),
                ok_order("bo-3"),
            ]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        let outcome = dispatcher.dispatch(&intent("k1"), true, true);
        assert!(matches!(outcome, DispatchOutcome::FailedRejected(_)));
        assert_eq!(broker_responses_remaining(&dispatcher), 1);
    }

    fn broker_responses_remaining(dispatcher: &OrderDispatcher<ScriptedBroker>) -> usize {
        dispatcher.broker.responses.borrow().len()
    }

    #[test]
    fn market_closed_queues_when_configured() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        let outcome = dispatcher.dispatch(&intent("k1"), false, true);
        assert_eq!(outcome, DispatchOutcome::QueuedForOpen);
    }

    #[test]
    fn market_closed_abandons_when_not_configured_to_queue() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        let outcome = dispatcher.dispatch(&intent("k1"), false, false);
        assert_eq!(outcome, DispatchOutcome::Abandoned);
    }

    #[test]
    fn broker_reported_market_closed_mid_retry_queues_instead_of_retrying() {
        let broker = ScriptedBroker {
            responses: RefCell::new(vec![Err(BrokerError::MarketClosed)]),
        };
        let mut dispatcher = OrderDispatcher::new(broker);
        let outcome = dispatcher.dispatch(&intent("k1"), true, true);
        assert_eq!(outcome, DispatchOutcome::QueuedForOpen);
    }
}
