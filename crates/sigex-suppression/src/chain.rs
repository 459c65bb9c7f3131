//! The seven-gate suppression chain. Each gate is checked in a fixed
//! order; the first one that rejects writes the reason and the remaining
//! gates are never evaluated, mirroring the host's policy-before-logic
//! ordering this crate is adapted from.

use std::collections::{HashMap, HashSet};

use sigex_risk::{check_feasibility, CandidateRisk, FeasibilityReject, RiskConfig};
use sigex_schemas::{CandidateSignal, DirectionLock, RiskLedger, Side, SuppressReason};

pub const COOLDOWN_SECONDS: i64 = 300;
pub const DIRECTION_LOCK_SECONDS: i64 = 900;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuppressionConfig {
    pub per_ticker_daily_cap: u32,
    pub global_daily_cap: u32,
}

fn sign_of(score: f64) -> i8 {
    if score >= 0.0 {
        1
    } else {
        -1
    }
}

/// Per-session suppression state. Owns every piece of state the seven gates
/// read and write: cooldown timestamps, direction locks, the dup-event set,
/// and daily counters. Nothing here is persisted across a day rollover.
#[derive(Default)]
pub struct SuppressionChain {
    day_key: String,
    per_ticker_daily_count: HashMap<String, u32>,
    global_daily_count: u32,
    last_emission_by_sign: HashMap<(String, i8), i64>,
    direction_locks: HashMap<String, DirectionLock>,
    dup_events: HashSet<(String, Side, i64, i64)>,
}

impl SuppressionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears daily counters when the session-local day rolls over.
    pub fn roll_day(&mut self, day_key: &str) {
        if self.day_key != day_key {
            self.day_key = day_key.to_string();
            self.per_ticker_daily_count.clear();
            self.global_daily_count = 0;
        }
    }

    /// Runs all seven gates in order. Returns the first rejection, or `Ok`
    /// if the candidate clears every gate (callers must then call
    /// [`commit`][Self::commit] to record the emission).
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &self,
        candidate: &CandidateSignal,
        now: i64,
        cutoff: f64,
        llm_denied_for_cost: bool,
        cfg: &SuppressionConfig,
        risk_cfg: &RiskConfig,
        ledger: &RiskLedger,
        candidate_risk: &CandidateRisk,
    ) -> Result<(), SuppressReason> {
        if candidate.base_score.abs() < cutoff {
            return Err(SuppressReason::BelowCutoff);
        }

        let sign = sign_of(candidate.base_score);
        if let Some(&last_ts) = self
            .last_emission_by_sign
            .get(&(candidate.ticker.clone(), sign))
        {
            if now - last_ts < COOLDOWN_SECONDS {
                return Err(SuppressReason::MixerCooldown);
            }
        }

        if let Some(lock) = self.direction_locks.get(&candidate.ticker) {
            if lock.side != candidate.side && now < lock.expires_at {
                return Err(SuppressReason::DirectionLock);
            }
        }

        let dup_key = (
            candidate.ticker.clone(),
            candidate.side,
            candidate.rounded_score(2),
            candidate.bar_ts,
        );
        if self.dup_events.contains(&dup_key) {
            return Err(SuppressReason::DupEvent);
        }

        let ticker_count = self
            .per_ticker_daily_count
            .get(&candidate.ticker)
            .copied()
            .unwrap_or(0);
        if ticker_count >= cfg.per_ticker_daily_cap || self.global_daily_count >= cfg.global_daily_cap {
            return Err(SuppressReason::SessionDailyCap);
        }

        if llm_denied_for_cost {
            return Err(SuppressReason::LlmGate);
        }

        check_feasibility(risk_cfg, ledger, candidate_risk).map_err(|reject| match reject {
            FeasibilityReject::KillSwitchTripped => SuppressReason::KillSwitch,
            _ => SuppressReason::RiskFeasibility,
        })?;

        Ok(())
    }

    /// Records an emission that cleared every gate: sets the cooldown and
    /// direction-lock timestamps, remembers the dup-event key, and
    /// increments the daily counters. Only called after `evaluate` returns
    /// `Ok`, so the counter tracks actionable signals, not noise.
    pub fn commit(&mut self, candidate: &CandidateSignal, now: i64) {
        let sign = sign_of(candidate.base_score);
        self.last_emission_by_sign
            .insert((candidate.ticker.clone(), sign), now);
        self.direction_locks.insert(
            candidate.ticker.clone(),
            DirectionLock {
                side: candidate.side,
                expires_at: now + DIRECTION_LOCK_SECONDS,
            },
        );
        self.dup_events.insert((
            candidate.ticker.clone(),
            candidate.side,
            candidate.rounded_score(2),
            candidate.bar_ts,
        ));
        *self
            .per_ticker_daily_count
            .entry(candidate.ticker.clone())
            .or_insert(0) += 1;
        self.global_daily_count += 1;
    }
}
