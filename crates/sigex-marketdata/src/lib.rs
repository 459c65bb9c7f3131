//! sigex-marketdata
//!
//! Live quote ingestion: a provider-agnostic fetch interface, strict-type
//! normalization, a per-ticker rolling bar store with session-aware gap
//! detection, pure indicator functions, and the tier scheduler that decides
//! when each ticker is next due for a fetch.

pub mod bar_store;
pub mod indicators;
pub mod normalizer;
pub mod provider;
pub mod scheduler;

pub use bar_store::{AppendOutcome, BarStore, TickerWindow};
pub use normalizer::{normalize, NormalizeError};
pub use provider::{LastPrice, ProviderError, QuoteProvider, RawBar};
pub use scheduler::{PollOutcome, TierPlan, TierScheduler};
