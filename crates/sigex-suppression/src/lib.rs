//! sigex-suppression
//!
//! The seven-gate suppression chain standing between the signal mixer and
//! the basket aggregator/risk manager. Grounded on
//! `mqk-strategy::host::StrategyHost`'s policy-enforced-before-logic
//! ordering (validate in a fixed sequence, fail on the first violation) and
//! `mqk-risk::types::ReasonCode`'s typed first-reason tagging, reusing
//! `sigex_schemas::SuppressReason` directly rather than a parallel enum.

mod chain;

pub use chain::{SuppressionChain, SuppressionConfig, COOLDOWN_SECONDS, DIRECTION_LOCK_SECONDS};
