//! Common candidate/config builders shared by the scenario tests, so each
//! test only states the fields its scenario actually varies.

use sigex_risk::{CandidateRisk, RiskConfig};
use sigex_schemas::{CandidateSignal, Micros, RegimeLabel, RiskLedger, Side};
use sigex_suppression::SuppressionConfig;
use uuid::Uuid;

pub fn candidate(ticker: &str, side: Side, score: f64, bar_ts: i64) -> CandidateSignal {
    CandidateSignal {
        id: Uuid::new_v4(),
        ticker: ticker.to_string(),
        side,
        base_score: score,
        tech_score: score,
        sent_score: 0.0,
        regime: RegimeLabel::Trend,
        horizon_minutes: 60,
        entry_ref_price: Micros::new(100_000_000),
        stop_price: Micros::new(98_000_000),
        target_price: Micros::new(106_000_000),
        trigger_tag: "trend".to_string(),
        edgar_override: false,
        created_at: bar_ts,
        bar_ts,
    }
}

pub fn suppression_cfg() -> SuppressionConfig {
    SuppressionConfig {
        per_ticker_daily_cap: 3,
        global_daily_cap: 100,
    }
}

pub fn risk_cfg() -> RiskConfig {
    RiskConfig {
        risk_per_trade: 0.01,
        max_concurrent_risk: 0.06,
        max_positions: 5,
        min_slots: 3,
        max_equity_exposure: 0.5,
        daily_loss_limit: 0.02,
    }
}

pub fn fresh_ledger(equity_micros: i64) -> RiskLedger {
    RiskLedger::new(Micros::new(equity_micros))
}

pub fn candidate_risk(candidate_risk_pct: f64, stop_distance_micros: i64) -> CandidateRisk {
    CandidateRisk {
        candidate_risk_pct,
        stop_distance_micros,
    }
}
