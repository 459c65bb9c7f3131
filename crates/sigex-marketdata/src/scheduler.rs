//! Tier scheduler: decides, once per polling tick, which tickers are due for
//! a quote fetch and gates each fetch behind the shared token bucket set.
//!
//! A ticker's cadence is tier-dependent (Tier A polls fastest, Bench is
//! event-only and never polled here). A failed or empty fetch does not
//! advance the ticker's last-ingest timestamp, so the next tick retries it
//! rather than silently skipping a cycle.

use std::collections::HashMap;

use sigex_ratelimit::TokenBucketSet;
use sigex_schemas::Tier;

use crate::provider::{ProviderError, QuoteProvider, RawBar};

/// Static tier assignment and per-tier cadence, mirroring the configured
/// tier ticker lists and cadence seconds.
#[derive(Debug, Clone)]
pub struct TierPlan {
    pub tier_a_tickers: Vec<String>,
    pub tier_b_tickers: Vec<String>,
    pub tier_a_cadence_seconds: i64,
    pub tier_b_cadence_seconds: i64,
}

impl TierPlan {
    fn tier_of(&self, symbol: &str) -> Option<Tier> {
        if self.tier_a_tickers.iter().any(|t| t == symbol) {
            Some(Tier::A)
        } else if self.tier_b_tickers.iter().any(|t| t == symbol) {
            Some(Tier::B)
        } else {
            None
        }
    }

    fn cadence_of(&self, tier: Tier) -> i64 {
        match tier {
            Tier::A => self.tier_a_cadence_seconds,
            Tier::B => self.tier_b_cadence_seconds,
            Tier::Reserve => self.tier_a_cadence_seconds,
        }
    }
}

/// Outcome of a single ticker's scheduling decision within one tick.
#[derive(Debug)]
pub enum PollOutcome {
    /// Cadence had not elapsed yet; nothing attempted.
    NotDue,
    /// Cadence elapsed but the token bucket denied the fetch this tick.
    RateLimited,
    /// Fetch attempted and succeeded; bars returned.
    Fetched(Vec<RawBar>),
    /// Fetch attempted but the provider returned an error; ingest timestamp
    /// is not advanced so the next tick retries.
    FetchFailed(ProviderError),
}

/// Cooperative per-ticker poll scheduler. Holds no provider state itself —
/// each tick is driven externally with the current time, so tests can
/// replay deterministic tick sequences.
pub struct TierScheduler {
    plan: TierPlan,
    last_ingest_ts: HashMap<String, i64>,
}

impl TierScheduler {
    pub fn new(plan: TierPlan) -> Self {
        Self {
            plan,
            last_ingest_ts: HashMap::new(),
        }
    }

    /// Evaluate one ticker for one tick at time `now`, consuming a token
    /// from `buckets` only when its cadence has elapsed.
    pub fn poll_ticker(
        &mut self,
        buckets: &TokenBucketSet,
        provider: &dyn QuoteProvider,
        symbol: &str,
        now: i64,
    ) -> PollOutcome {
        let Some(tier) = self.plan.tier_of(symbol) else {
            return PollOutcome::NotDue;
        };
        let cadence = self.plan.cadence_of(tier);
        let last = self.last_ingest_ts.get(symbol).copied().unwrap_or(0);
        if now - last < cadence {
            return PollOutcome::NotDue;
        }

        let outcome = buckets.try_consume(tier, 1, now);
        if !outcome.allowed {
            return PollOutcome::RateLimited;
        }

        let since_ts = last;
        match provider.get_bars(symbol, since_ts) {
            Ok(bars) if !bars.is_empty() => {
                self.last_ingest_ts.insert(symbol.to_string(), now);
                PollOutcome::Fetched(bars)
            }
            Ok(_) => PollOutcome::FetchFailed(ProviderError::Empty),
            Err(e) => PollOutcome::FetchFailed(e),
        }
    }

    pub fn last_ingest_ts(&self, symbol: &str) -> Option<i64> {
        self.last_ingest_ts.get(symbol).copied()
    }
}
