//! Shared types for the signal-to-order pipeline: fixed-point prices, the
//! strict internal data model, and the loosely-typed wire-boundary records.

mod domain;
mod micros;
mod wire;

pub use domain::{
    Bar, BarError, BasketEntry, CandidateSignal, DirectionLock, EtfLock, Indicators, OrderIntent,
    OrderIntentMeta, Position, Regime, RegimeLabel, RiskLedger, Side, SuppressReason,
    SuppressionRecord, Tier, BAR_ALIGN_SECONDS, MIN_BAR_WINDOW,
};
pub use micros::{Micros, MICROS_PER_UNIT};
pub use wire::{
    parse_price_micros, BrokerAccount, BrokerFill, BrokerOrder, BrokerPosition, BrokerSnapshot,
    RawBar, WireParseError,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single envelope wrapping any payload moving through the audit log or an
/// inter-component channel. `correlation_id` threads one signal's lifecycle
/// end to end (candidate -> suppression/order -> fill); `causation_id` names
/// the specific prior event that produced this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub event_id: Uuid,
    pub run_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,
    pub topic: String,
    pub event_type: String,
    pub payload: T,
}
