//! sigex-testkit
//!
//! Shared fixtures and a deterministic fake broker for the end-to-end
//! `tests/scenario_*.rs` files in this crate, one per literal scenario
//! named in the testable-properties list: basket short fires once,
//! duplicate submission, daily cap counts only actionable candidates, the
//! risk kill switch, EOD flatten idempotence, and the direction lock.
//! Grounded on the previous revision's `FakeBroker` (a deterministic
//! stand-in broker for scenario assembly), generalized from a recovery
//! harness into the `sigex_execution::BrokerAdapter` trait this pipeline
//! actually has.

mod fake_broker;
mod fixtures;

pub use fake_broker::RecordingBroker;
pub use fixtures::{candidate, candidate_risk, fresh_ledger, risk_cfg, suppression_cfg};
