/// Risk thresholds. Field names mirror `sigex_config::RiskSection` so a
/// loaded config can be passed straight through without renaming; this
/// crate does not depend on `sigex-config` itself, to keep the policy
/// logic testable against plain literals.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskConfig {
    pub risk_per_trade: f64,
    pub max_concurrent_risk: f64,
    pub max_positions: u32,
    pub min_slots: u32,
    pub max_equity_exposure: f64,
    pub daily_loss_limit: f64,
}

/// Why a feasibility check failed. Maps 1:1 onto
/// [`sigex_schemas::SuppressReason::RiskFeasibility`] at the suppression
/// chain boundary — the detail here is for logging, the chain only needs
/// to know it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeasibilityReject {
    KillSwitchTripped,
    DailyLossLimitBreached,
    MaxPositionsReached,
    MaxConcurrentRiskExceeded,
    NonPositiveStopDistance,
}

/// A candidate's risk draw, computed from its entry/stop distance, before
/// sizing. Expressed as a fraction of equity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateRisk {
    pub candidate_risk_pct: f64,
    pub stop_distance_micros: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSizeInput {
    pub equity_micros: i64,
    pub entry_micros: i64,
    pub stop_micros: i64,
    pub confidence_adj: f64,
    pub current_open_positions: u32,
    /// Shrink factor applied for leveraged/inverse ETF exec symbols; `1.0`
    /// for ordinary equities.
    pub leverage_shrink: f64,
    pub fractional_enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSizeResult {
    pub qty: i64,
    pub size_risk: i64,
    pub size_cap: i64,
}
