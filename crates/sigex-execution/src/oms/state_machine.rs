//! Order lifecycle state machine.
//!
//! Tracks a single dispatched order from submission through its eventual
//! close. Every event is applied through [`OrderLifecycle::apply`], which
//! enforces two invariants carried over from the broker-order state machine
//! this is adapted from:
//!
//! 1. **Legal transitions only.** An illegal event returns
//!    [`TransitionError`]; callers must treat that as a halt/alert signal,
//!    not a retry condition.
//! 2. **Idempotent replay.** If an `event_id` is supplied and has already
//!    been applied, the call is a silent no-op.
//!
//! ```text
//! Submitted ──Fill──► Filled ──CloseStop────► ClosedByStop   (terminal)
//!     │                  │───CloseTarget───► ClosedByTarget (terminal)
//!     │                  │───CloseEod──────► ClosedByEod    (terminal)
//!     │                  └───CloseManual────► ClosedByManual(terminal)
//!     └──Reject──► Failed (terminal)
//! ```

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderState {
    Submitted,
    Filled,
    Failed,
    ClosedByStop,
    ClosedByTarget,
    ClosedByEod,
    ClosedByManual,
}

impl OrderState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Failed
                | Self::ClosedByStop
                | Self::ClosedByTarget
                | Self::ClosedByEod
                | Self::ClosedByManual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderEvent {
    Fill { qty: i64 },
    Reject,
    CloseStop,
    CloseTarget,
    CloseEod,
    CloseManual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: OrderState,
    pub event: String,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "illegal order transition: {:?} + {}", self.from, self.event)
    }
}

impl std::error::Error for TransitionError {}

/// A dispatched order tracked through an explicit state machine, keyed by
/// the idempotency key it was submitted under.
#[derive(Debug, Clone)]
pub struct OrderLifecycle {
    pub idempotency_key: String,
    pub symbol: String,
    pub filled_qty: i64,
    pub state: OrderState,
    applied: HashSet<String>,
}

impl OrderLifecycle {
    pub fn new(idempotency_key: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            idempotency_key: idempotency_key.into(),
            symbol: symbol.into(),
            filled_qty: 0,
            state: OrderState::Submitted,
            applied: HashSet::new(),
        }
    }

    pub fn apply(
        &mut self,
        event: OrderEvent,
        event_id: Option<&str>,
    ) -> Result<(), TransitionError> {
        if let Some(id) = event_id {
            if self.applied.contains(id) {
                return Ok(());
            }
        }

        let next = match (self.state, event) {
            (OrderState::Submitted, OrderEvent::Fill { qty }) => {
                self.filled_qty += qty;
                OrderState::Filled
            }
            (OrderState::Submitted, OrderEvent::Reject) => OrderState::Failed,
            (OrderState::Filled, OrderEvent::CloseStop) => OrderState::ClosedByStop,
            (OrderState::Filled, OrderEvent::CloseTarget) => OrderState::ClosedByTarget,
            (OrderState::Filled, OrderEvent::CloseEod) => OrderState::ClosedByEod,
            (OrderState::Filled, OrderEvent::CloseManual) => OrderState::ClosedByManual,
            (from, event) => {
                return Err(TransitionError {
                    from,
                    event: format!("{:?}", event),
                })
            }
        };

        if let Some(id) = event_id {
            self.applied.insert(id.to_string());
        }
        self.state = next;
        Ok(())
    }
}
