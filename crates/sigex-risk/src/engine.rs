use sigex_schemas::RiskLedger;

use crate::types::{
    CandidateRisk, FeasibilityReject, PositionSizeInput, PositionSizeResult, RiskConfig,
};

/// Checks (i)-(v) in order, first failure wins, mirroring the teacher's
/// guard-before-tick discipline: kill switch, then daily loss, then position
/// count, then aggregate risk, then stop-distance sanity.
pub fn check_feasibility(
    cfg: &RiskConfig,
    ledger: &RiskLedger,
    candidate: &CandidateRisk,
) -> Result<(), FeasibilityReject> {
    if ledger.kill_switched {
        return Err(FeasibilityReject::KillSwitchTripped);
    }
    if ledger.daily_realized_pnl_pct <= -cfg.daily_loss_limit {
        return Err(FeasibilityReject::DailyLossLimitBreached);
    }
    if ledger.open_positions_count >= cfg.max_positions {
        return Err(FeasibilityReject::MaxPositionsReached);
    }
    if ledger.current_risk_pct + candidate.candidate_risk_pct > cfg.max_concurrent_risk {
        return Err(FeasibilityReject::MaxConcurrentRiskExceeded);
    }
    if candidate.stop_distance_micros <= 0 {
        return Err(FeasibilityReject::NonPositiveStopDistance);
    }
    Ok(())
}

/// Position sizing: the smaller of a risk-based size and an
/// exposure-capped size, shrunk for leveraged/inverse ETFs and floored to
/// one share unless fractional trading is enabled.
pub fn size_position(cfg: &RiskConfig, input: &PositionSizeInput) -> PositionSizeResult {
    let stop_distance = (input.entry_micros - input.stop_micros).unsigned_abs() as i64;
    let risk_amount =
        (input.equity_micros as f64) * cfg.risk_per_trade * input.confidence_adj;
    let size_risk = if stop_distance > 0 {
        (risk_amount / stop_distance as f64).floor() as i64
    } else {
        0
    };

    let remaining_slots = cfg.min_slots.saturating_sub(input.current_open_positions).max(1);
    let exposure_budget = (input.equity_micros as f64) * cfg.max_equity_exposure
        / remaining_slots as f64;
    let size_cap = if input.entry_micros > 0 {
        (exposure_budget / input.entry_micros as f64).floor() as i64
    } else {
        0
    };

    let mut qty = size_risk.min(size_cap);
    qty = ((qty as f64) * input.leverage_shrink).floor() as i64;

    if qty < 1 && !input.fractional_enabled {
        qty = 1;
    }

    PositionSizeResult {
        qty,
        size_risk,
        size_cap,
    }
}

/// Record a fill: add the realized risk draw and open-position count.
pub fn apply_fill(ledger: &mut RiskLedger, candidate_risk_pct: f64) {
    ledger.current_risk_pct += candidate_risk_pct;
    ledger.open_positions_count += 1;
}

/// Record a close: release its risk draw, apply realized PnL, and trip the
/// kill switch for the rest of the session if the daily loss limit is
/// crossed.
pub fn apply_close(cfg: &RiskConfig, ledger: &mut RiskLedger, candidate_risk_pct: f64, realized_pnl_pct: f64) {
    ledger.current_risk_pct = (ledger.current_risk_pct - candidate_risk_pct).max(0.0);
    ledger.open_positions_count = ledger.open_positions_count.saturating_sub(1);
    ledger.daily_realized_pnl_pct += realized_pnl_pct;
    if ledger.daily_realized_pnl_pct <= -cfg.daily_loss_limit {
        ledger.kill_switched = true;
    }
}
