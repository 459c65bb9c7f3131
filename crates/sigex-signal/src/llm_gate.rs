//! LLM insight gate: decides whether a candidate is worth the cost of an
//! LLM call before sentiment is folded into the mixer.
//!
//! Pure decision function — callers own the daily counter and the
//! per-(event_type, ticker) cache, and pass their current values in rather
//! than this module reading or mutating shared state itself.

const STRONG_SIGNAL_THRESHOLD: f64 = 0.70;
const CACHE_TTL_SECONDS: i64 = 30 * 60;

const REQUIRED_EVENTS: &[&str] = &[
    "edgar",
    "vol_spike",
    "fed_speech",
    "rate_decision",
    "market_news",
    "tech_earnings",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    DeniedWeakSignal,
    DeniedDailyCapReached,
    DeniedRecentCacheHit,
}

impl GateDecision {
    pub fn allowed(self) -> bool {
        self == GateDecision::Allow
    }
}

/// An LLM analysis result, as returned by the external analysis service on
/// an allowed call.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmInsight {
    pub sentiment: f64,
    pub trigger: String,
    pub horizon_minutes: u32,
    pub summary: String,
}

impl LlmInsight {
    /// Clamp sentiment to `[-1, 1]` and horizon to `[15, 480]` minutes, in
    /// case the upstream service returns an out-of-range value.
    pub fn normalized(mut self) -> Self {
        self.sentiment = self.sentiment.clamp(-1.0, 1.0);
        self.horizon_minutes = self.horizon_minutes.clamp(15, 480);
        self
    }
}

/// Decide whether the LLM should be consulted for this candidate.
///
/// `last_cache_hit_age_secs` is the age, in seconds, of the most recent
/// cache entry for `(event_type, ticker)`, or `None` if there is none.
pub fn should_call_llm(
    event_type: &str,
    signal_score: f64,
    calls_today: u32,
    daily_call_limit: u32,
    last_cache_hit_age_secs: Option<i64>,
) -> GateDecision {
    let event_qualifies = REQUIRED_EVENTS.contains(&event_type);
    let score_qualifies = signal_score.abs() >= STRONG_SIGNAL_THRESHOLD;

    if !event_qualifies && !score_qualifies {
        return GateDecision::DeniedWeakSignal;
    }
    if calls_today >= daily_call_limit {
        return GateDecision::DeniedDailyCapReached;
    }
    if let Some(age) = last_cache_hit_age_secs {
        if age < CACHE_TTL_SECONDS {
            return GateDecision::DeniedRecentCacheHit;
        }
    }
    GateDecision::Allow
}
