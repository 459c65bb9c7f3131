//! Basket aggregator and inverse-ETF routing.
//!
//! Individual-ticker short candidates never submit as direct shorts; they
//! only feed a sliding window per basket. Aggregation fires a single
//! inverse-ETF entry once four conditions hold on two consecutive ticks.
//! This is the central routing rule: it replaces a one-to-one ticker→order
//! mapping that caused duplicate ETF buys.
//!
//! Validate-then-reject-with-a-reason is the same shape
//! `mqk-portfolio::allocator::Allocator::allocate` uses for its constraint
//! checks, applied here to the fire conditions instead of portfolio weights.

use std::collections::{HashMap, VecDeque};

use sigex_schemas::{BasketEntry, EtfLock, SuppressReason};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasketDef {
    pub id: &'static str,
    pub members: &'static [&'static str],
    pub inverse_etf: &'static str,
}

pub const MEGATECH: BasketDef = BasketDef {
    id: "MEGATECH",
    members: &["AAPL", "MSFT", "GOOGL", "AMZN", "META"],
    inverse_etf: "SQQQ",
};

pub const SEMIS: BasketDef = BasketDef {
    id: "SEMIS",
    members: &["NVDA", "AMD", "INTC", "TSM", "AVGO", "QCOM"],
    inverse_etf: "SOXS",
};

pub const PREDEFINED_BASKETS: &[BasketDef] = &[MEGATECH, SEMIS];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketConfig {
    pub window_seconds: i64,
    pub min_signals: usize,
    pub neg_fraction: f64,
    pub mean_threshold: f64,
    pub etf_lock_ttl_seconds: i64,
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            min_signals: 3,
            neg_fraction: 0.7,
            mean_threshold: -0.4,
            etf_lock_ttl_seconds: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasketFireEvent {
    pub basket_id: &'static str,
    pub inverse_etf: &'static str,
    pub ts: i64,
    pub member_count: usize,
    pub mean_score: f64,
}

#[derive(Default)]
struct BasketWindow {
    entries: VecDeque<BasketEntry>,
    consecutive_satisfying_ticks: u32,
}

#[derive(Default)]
pub struct BasketAggregator {
    windows: HashMap<&'static str, BasketWindow>,
    locks: HashMap<&'static str, EtfLock>,
}

impl BasketAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a short candidate to its basket's sliding window. Only short
    /// candidates for a basket member are accepted; long candidates bypass
    /// the aggregator entirely and trade their own ticker directly, so
    /// they are never passed here.
    pub fn ingest_short_candidate(&mut self, basket: &BasketDef, ticker: &str, score: f64, ts: i64, cfg: &BasketConfig) {
        if score >= 0.0 || !basket.members.contains(&ticker) {
            return;
        }
        let window = self.windows.entry(basket.id).or_default();
        let cutoff = ts - cfg.window_seconds;
        window.entries.retain(|e| e.ts > cutoff);
        window.entries.retain(|e| !(e.ticker == ticker && e.ts == ts));
        window.entries.push_back(BasketEntry {
            ticker: ticker.to_string(),
            score,
            ts,
        });
    }

    fn lock_is_live(&self, etf: &str, now: i64) -> bool {
        self.locks.get(etf).is_some_and(|l| l.expires_at > now)
    }

    fn conditions_hold(&self, basket: &BasketDef, cfg: &BasketConfig, now: i64, etf_already_held: bool) -> bool {
        let Some(window) = self.windows.get(basket.id) else {
            return false;
        };
        if window.entries.is_empty() {
            return false;
        }
        let distinct: std::collections::HashSet<&str> =
            window.entries.iter().map(|e| e.ticker.as_str()).collect();
        if distinct.len() < cfg.min_signals {
            return false;
        }
        let neg_count = window.entries.iter().filter(|e| e.score < 0.0).count();
        let neg_fraction = neg_count as f64 / window.entries.len() as f64;
        if neg_fraction < cfg.neg_fraction {
            return false;
        }
        let mean: f64 = window.entries.iter().map(|e| e.score).sum::<f64>() / window.entries.len() as f64;
        if mean > cfg.mean_threshold {
            return false;
        }
        if etf_already_held || self.lock_is_live(basket.inverse_etf, now) {
            return false;
        }
        true
    }

    /// Advances the per-basket consecutive-tick counter. Call once per
    /// scheduler tick, after ingesting this tick's candidates.
    ///
    /// Returns `true` once the four conditions have held on two consecutive
    /// ticks, meaning [`fire`][Self::fire] should be attempted.
    pub fn tick(&mut self, basket: &BasketDef, cfg: &BasketConfig, now: i64, etf_already_held: bool) -> bool {
        let cutoff = now - cfg.window_seconds;
        self.windows
            .entry(basket.id)
            .or_default()
            .entries
            .retain(|e| e.ts > cutoff);

        let holds = self.conditions_hold(basket, cfg, now, etf_already_held);
        let window = self.windows.entry(basket.id).or_default();
        if holds {
            window.consecutive_satisfying_ticks += 1;
        } else {
            window.consecutive_satisfying_ticks = 0;
        }
        window.consecutive_satisfying_ticks >= 2
    }

    /// Attempts to fire the basket: acquires the ETF single-flight lock and
    /// checks for a conflicting long position on the base index. Resets the
    /// consecutive-tick counter regardless of outcome, so a reject requires
    /// two fresh ticks before the next attempt.
    pub fn fire(
        &mut self,
        basket: &BasketDef,
        cfg: &BasketConfig,
        now: i64,
        holder: Uuid,
        conflicting_long_position: bool,
    ) -> Result<BasketFireEvent, SuppressReason> {
        if let Some(window) = self.windows.get_mut(basket.id) {
            window.consecutive_satisfying_ticks = 0;
        }

        if self.lock_is_live(basket.inverse_etf, now) {
            return Err(SuppressReason::EtfLock);
        }
        if conflicting_long_position {
            return Err(SuppressReason::ConflictingPosition);
        }

        self.locks.insert(
            basket.inverse_etf,
            EtfLock {
                holder,
                expires_at: now + cfg.etf_lock_ttl_seconds,
            },
        );

        let window = self.windows.get(basket.id).expect("conditions_hold required a window");
        let member_count = window.entries.len();
        let mean_score = window.entries.iter().map(|e| e.score).sum::<f64>() / member_count as f64;

        Ok(BasketFireEvent {
            basket_id: basket.id,
            inverse_etf: basket.inverse_etf,
            ts: now,
            member_count,
            mean_score,
        })
    }

    pub fn release_lock(&mut self, etf: &str) {
        self.locks.remove(etf);
    }
}
