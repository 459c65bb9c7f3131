//! Token bucket rate limiting.
//!
//! Pure deterministic logic: every operation takes `now` as an explicit
//! epoch-second argument rather than reading the wall clock, so refill and
//! fallback behavior are reproducible in tests. Concurrency within a
//! process is handled with a mutex; there is no cross-process coordination
//! (no shared store), so "atomic" here means atomic with respect to
//! concurrent callers in this service instance.

use sigex_schemas::Tier;
use std::collections::HashSet;
use std::sync::Mutex;

/// A single tier's bucket: capacity, lazy refill rate, and current level.
#[derive(Debug, Clone, Copy)]
pub struct TokenBucket {
    capacity: u32,
    refill_per_period: u32,
    refill_period_secs: i64,
    tokens: u32,
    last_refill_ts: i64,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_per_period: u32, refill_period_secs: i64, now: i64) -> Self {
        Self {
            capacity,
            refill_per_period,
            refill_period_secs,
            tokens: capacity,
            last_refill_ts: now,
        }
    }

    /// Credits elapsed whole periods since the last refill. `last_refill_ts`
    /// advances by exactly the applied increments, not to `now`, so a
    /// fractional period is never silently dropped.
    fn refill(&mut self, now: i64) {
        if now <= self.last_refill_ts || self.refill_period_secs <= 0 {
            return;
        }
        let elapsed_periods = (now - self.last_refill_ts) / self.refill_period_secs;
        if elapsed_periods <= 0 {
            return;
        }
        let credited = elapsed_periods as u64 * self.refill_per_period as u64;
        self.tokens = (self.tokens as u64 + credited).min(self.capacity as u64) as u32;
        self.last_refill_ts += elapsed_periods * self.refill_period_secs;
    }

    fn try_consume(&mut self, now: i64, n: u32) -> bool {
        self.refill(now);
        if self.tokens >= n {
            self.tokens -= n;
            true
        } else {
            false
        }
    }

    pub fn tokens_available(&self, now: i64) -> u32 {
        let mut probe = *self;
        probe.refill(now);
        probe.tokens
    }
}

/// Outcome of a `try_consume` call, recording whether the Reserve-tier
/// fallback path was exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeOutcome {
    pub allowed: bool,
    pub used_reserve_fallback: bool,
}

/// The three provider-quota tiers (A, B, Reserve), with the early-minute
/// Reserve fallback rule for Tier A.
pub struct TokenBucketSet {
    tier_a: Mutex<TokenBucket>,
    tier_b: Mutex<TokenBucket>,
    reserve: Mutex<TokenBucket>,
    fallback_used: Mutex<HashSet<(Tier, i64)>>,
}

const FALLBACK_WINDOW_SECS: i64 = 10;

impl TokenBucketSet {
    pub fn new(tier_a: TokenBucket, tier_b: TokenBucket, reserve: TokenBucket) -> Self {
        Self {
            tier_a: Mutex::new(tier_a),
            tier_b: Mutex::new(tier_b),
            reserve: Mutex::new(reserve),
            fallback_used: Mutex::new(HashSet::new()),
        }
    }

    /// Non-blocking: returns immediately with the outcome. A caller that
    /// cannot consume is expected to skip this tick rather than wait.
    pub fn try_consume(&self, tier: Tier, n: u32, now: i64) -> ConsumeOutcome {
        let bucket = match tier {
            Tier::A => &self.tier_a,
            Tier::B => &self.tier_b,
            Tier::Reserve => &self.reserve,
        };
        let mut guard = bucket.lock().expect("token bucket mutex poisoned");
        if guard.try_consume(now, n) {
            return ConsumeOutcome {
                allowed: true,
                used_reserve_fallback: false,
            };
        }
        drop(guard);

        if tier == Tier::A && now % 60 < FALLBACK_WINDOW_SECS {
            let minute_key = now / 60;
            let mut used = self.fallback_used.lock().expect("fallback set mutex poisoned");
            if used.contains(&(tier, minute_key)) {
                return ConsumeOutcome {
                    allowed: false,
                    used_reserve_fallback: false,
                };
            }
            let mut reserve_guard = self.reserve.lock().expect("token bucket mutex poisoned");
            if reserve_guard.try_consume(now, n) {
                used.insert((tier, minute_key));
                return ConsumeOutcome {
                    allowed: true,
                    used_reserve_fallback: true,
                };
            }
        }

        ConsumeOutcome {
            allowed: false,
            used_reserve_fallback: false,
        }
    }

    pub fn tokens_available(&self, tier: Tier, now: i64) -> u32 {
        match tier {
            Tier::A => self.tier_a.lock().expect("mutex poisoned").tokens_available(now),
            Tier::B => self.tier_b.lock().expect("mutex poisoned").tokens_available(now),
            Tier::Reserve => self.reserve.lock().expect("mutex poisoned").tokens_available(now),
        }
    }
}
