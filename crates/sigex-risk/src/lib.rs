//! sigex-risk
//!
//! Feasibility gate and position sizing for the risk manager. Pure
//! functions over an explicit [`sigex_schemas::RiskLedger`] — no IO, no
//! hidden state — following the same guard-ordering discipline the
//! teacher's kill-switch engine uses, applied to this system's own
//! thresholds instead of PDT/drawdown/reject-storm rules.

mod engine;
mod types;

pub use engine::{apply_close, apply_fill, check_feasibility, size_position};
pub use types::{
    CandidateRisk, FeasibilityReject, PositionSizeInput, PositionSizeResult, RiskConfig,
};
