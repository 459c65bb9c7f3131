//! Strict internal data model for the signal-to-order pipeline.
//!
//! These are the coerced, validated types that every component downstream
//! of the quote-provider/broker boundary reads and writes. Nothing here
//! carries an `f64` price; prices are integer micros via [`crate::Micros`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Micros;

/// Alignment boundary for bars: 30-second buckets via floor division on the
/// epoch-second timestamp.
pub const BAR_ALIGN_SECONDS: i64 = 30;

/// Minimum rolling-window depth the Bar Store retains per ticker.
pub const MIN_BAR_WINDOW: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bar / Indicators / Regime
// ---------------------------------------------------------------------------

/// A single 30-second-aligned OHLCV bar for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: i64,
    pub open: Micros,
    pub high: Micros,
    pub low: Micros,
    pub close: Micros,
    pub volume: i64,
    pub spread_est: Option<Micros>,
}

/// Errors returned when a [`Bar`] fails its own invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarError {
    NotAligned,
    HighBelowBody,
    LowAboveBody,
    NegativeVolume,
}

impl Bar {
    /// Floor-align a raw timestamp to the nearest 30-second boundary.
    pub fn align_ts(ts: i64) -> i64 {
        ts.div_euclid(BAR_ALIGN_SECONDS) * BAR_ALIGN_SECONDS
    }

    /// Validate the invariants from the data model: `h >= max(o,c)`,
    /// `l <= min(o,c)`, `volume >= 0`, `ts` 30s-aligned.
    pub fn validate(&self) -> Result<(), BarError> {
        if Self::align_ts(self.ts) != self.ts {
            return Err(BarError::NotAligned);
        }
        let body_high = self.open.max(self.close);
        let body_low = self.open.min(self.close);
        if self.high < body_high {
            return Err(BarError::HighBelowBody);
        }
        if self.low > body_low {
            return Err(BarError::LowAboveBody);
        }
        if self.volume < 0 {
            return Err(BarError::NegativeVolume);
        }
        Ok(())
    }
}

/// Derived per-ticker indicator snapshot. Pure function of the current bar
/// window; undefined (represented by the absence of this type, not by
/// sentinel values) until the window reaches each indicator's minimum
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub bollinger_position: f64,
    pub atr: f64,
    pub vwap_dev: f64,
    pub volume_z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeLabel {
    Trend,
    VolSpike,
    MeanRevert,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub label: RegimeLabel,
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Candidate Signal / Suppression
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub id: Uuid,
    pub ticker: String,
    pub side: Side,
    pub base_score: f64,
    pub tech_score: f64,
    pub sent_score: f64,
    pub regime: RegimeLabel,
    pub horizon_minutes: u32,
    pub entry_ref_price: Micros,
    pub stop_price: Micros,
    pub target_price: Micros,
    pub trigger_tag: String,
    pub edgar_override: bool,
    pub created_at: i64,
    /// The bar this candidate was scored against; used for dup-event keys.
    pub bar_ts: i64,
}

impl CandidateSignal {
    pub fn rounded_score(&self, decimals: i32) -> i64 {
        let scale = 10f64.powi(decimals);
        (self.base_score * scale).round() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuppressReason {
    BelowCutoff,
    MixerCooldown,
    DirectionLock,
    DupEvent,
    SessionDailyCap,
    LlmGate,
    RiskFeasibility,
    EtfLock,
    ConflictingPosition,
    InsufficientHistory,
    RateLimit,
    MarketClosed,
    KillSwitch,
    ExternalError,
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SuppressReason::BelowCutoff => "below_cutoff",
            SuppressReason::MixerCooldown => "mixer_cooldown",
            SuppressReason::DirectionLock => "direction_lock",
            SuppressReason::DupEvent => "dup_event",
            SuppressReason::SessionDailyCap => "session_daily_cap",
            SuppressReason::LlmGate => "llm_gate",
            SuppressReason::RiskFeasibility => "risk_feasibility",
            SuppressReason::EtfLock => "etf_lock",
            SuppressReason::ConflictingPosition => "conflicting_position",
            SuppressReason::InsufficientHistory => "insufficient_history",
            SuppressReason::RateLimit => "rate_limit",
            SuppressReason::MarketClosed => "market_closed",
            SuppressReason::KillSwitch => "kill_switch",
            SuppressReason::ExternalError => "external_error",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressionRecord {
    pub signal_id: Uuid,
    pub reason: SuppressReason,
    /// (gate name, epoch-ms) for every gate evaluated before the halt.
    pub gate_timestamps: Vec<(String, i64)>,
}

// ---------------------------------------------------------------------------
// Basket window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketEntry {
    pub ticker: String,
    pub score: f64,
    pub ts: i64,
}

// ---------------------------------------------------------------------------
// Order Intent / Position
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIntentMeta {
    pub source_signal_id: Option<Uuid>,
    pub basket_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIntent {
    pub idempotency_key: String,
    pub exec_symbol: String,
    pub side: Side,
    pub qty: i64,
    pub entry: Micros,
    pub stop: Micros,
    pub target: Micros,
    pub meta: OrderIntentMeta,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub qty: i64,
    pub avg_price: Micros,
    pub stop: Option<Micros>,
    pub target: Option<Micros>,
    pub opened_at: i64,
}

// ---------------------------------------------------------------------------
// Token bucket / locks / risk ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    Reserve,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EtfLock {
    pub holder: Uuid,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DirectionLock {
    pub side: Side,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskLedger {
    pub equity: Micros,
    pub current_risk_pct: f64,
    pub open_positions_count: u32,
    pub daily_realized_pnl_pct: f64,
    pub kill_switched: bool,
}

impl RiskLedger {
    pub fn new(equity: Micros) -> Self {
        Self {
            equity,
            current_risk_pct: 0.0,
            open_positions_count: 0,
            daily_realized_pnl_pct: 0.0,
            kill_switched: false,
        }
    }
}
