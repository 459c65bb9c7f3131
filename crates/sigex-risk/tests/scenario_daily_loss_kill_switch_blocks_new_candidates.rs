use sigex_risk::{apply_close, apply_fill, check_feasibility, CandidateRisk, FeasibilityReject, RiskConfig};
use sigex_schemas::{Micros, RiskLedger};

#[test]
fn scenario_daily_loss_kill_switch_blocks_new_candidates_for_rest_of_session() {
    let cfg = RiskConfig {
        risk_per_trade: 0.01,
        max_concurrent_risk: 0.06,
        max_positions: 5,
        min_slots: 3,
        max_equity_exposure: 0.5,
        daily_loss_limit: 0.02,
    };
    let mut ledger = RiskLedger::new(Micros::new(50_000_000_000));

    apply_fill(&mut ledger, 0.02);
    apply_close(&cfg, &mut ledger, 0.02, -0.025);
    assert!(ledger.kill_switched);

    let candidate = CandidateRisk {
        candidate_risk_pct: 0.005,
        stop_distance_micros: 500_000,
    };
    assert_eq!(
        check_feasibility(&cfg, &ledger, &candidate),
        Err(FeasibilityReject::KillSwitchTripped)
    );
}
