//! sigex-execution
//!
//! Order dispatcher: idempotent market-order submission, stop/target
//! bracket attachment, and the broker-facing order lifecycle. Grounded on
//! the router/adapter split and idempotent event-sourced state machine this
//! crate adapts from, applied to this pipeline's own `OrderIntent` shape
//! instead of a cancel/replace-heavy OMS problem.

mod broker_adapter;
mod dispatcher;
mod oms;

pub use broker_adapter::{BrokerAdapter, BrokerError, MarketOrderRequest};
pub use dispatcher::{backoff_seconds, idempotency_key, DispatchOutcome, OrderDispatcher};
pub use oms::state_machine::{OrderEvent, OrderLifecycle, OrderState, TransitionError};
