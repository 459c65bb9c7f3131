//! sigex-signal
//!
//! Regime classification, technical scoring, the LLM insight gate, and the
//! score mixer that turns an indicator snapshot into a [`CandidateSignal`].
//!
//! The pipeline enforces its stage order the way a strategy host enforces
//! policy before handing control to strategy logic: regime classification
//! always runs before scoring, scoring always runs before mixing, and the
//! mixer never sees a signal score or sentiment it didn't compute itself.

pub mod llm_gate;
pub mod mixer;
pub mod regime;
pub mod tech_score;

pub use llm_gate::{should_call_llm, GateDecision, LlmInsight};
pub use mixer::{mix, MixOutcome};
pub use regime::classify as classify_regime;
pub use tech_score::score as tech_score;

use sigex_schemas::{CandidateSignal, Indicators, Micros, Regime, Side};
use uuid::Uuid;

/// Stop/target distance from entry, expressed as a multiple of ATR.
///
/// Not named directly in config: the mixer needs *some* stop distance to
/// populate `CandidateSignal` before the risk manager runs its feasibility
/// check, and ATR is the only volatility measure already on hand. A fixed
/// 1.5x/3x (1:2 reward-to-risk) split is used until a dedicated stop model
/// is warranted.
const STOP_ATR_MULTIPLE: f64 = 1.5;
const TARGET_ATR_MULTIPLE: f64 = 3.0;

/// Evaluates one ticker's bar close into a fully-formed [`CandidateSignal`].
///
/// Stateless and deterministic: every input the caller doesn't already hold
/// (regime, tech score, mixed score, horizon) is derived here from
/// `indicators` and `sentiment` alone.
pub struct SignalPipeline;

impl SignalPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Run the full regime -> tech-score -> mix pipeline for one ticker.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &self,
        ticker: &str,
        indicators: &Indicators,
        entry_ref_price: Micros,
        sentiment: f64,
        edgar_event: bool,
        llm_horizon_minutes: Option<u32>,
        bar_ts: i64,
        now: i64,
    ) -> CandidateSignal {
        let regime: Regime = regime::classify(indicators);
        let tech = tech_score::score(indicators);
        let mixed = mixer::mix(
            tech,
            sentiment,
            regime.label,
            edgar_event,
            llm_horizon_minutes,
        );

        let side = if mixed.score >= 0.0 { Side::Buy } else { Side::Sell };
        let stop_distance = (indicators.atr * STOP_ATR_MULTIPLE * 1_000_000.0) as i64;
        let target_distance = (indicators.atr * TARGET_ATR_MULTIPLE * 1_000_000.0) as i64;
        let (stop_price, target_price) = match side {
            Side::Buy => (
                Micros::new(entry_ref_price.raw() - stop_distance),
                Micros::new(entry_ref_price.raw() + target_distance),
            ),
            Side::Sell => (
                Micros::new(entry_ref_price.raw() + stop_distance),
                Micros::new(entry_ref_price.raw() - target_distance),
            ),
        };

        CandidateSignal {
            id: Uuid::new_v4(),
            ticker: ticker.to_string(),
            side,
            base_score: mixed.score,
            tech_score: tech,
            sent_score: sentiment,
            regime: regime.label,
            horizon_minutes: mixed.horizon_minutes,
            entry_ref_price,
            stop_price,
            target_price,
            trigger_tag: if edgar_event {
                "edgar".to_string()
            } else {
                format!("{:?}", regime.label).to_lowercase()
            },
            edgar_override: edgar_event,
            created_at: now,
            bar_ts,
        }
    }
}

impl Default for SignalPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_bullish_indicators() -> Indicators {
        Indicators {
            ema_fast: 103.0,
            ema_slow: 100.0,
            rsi: 65.0,
            bollinger_position: 1.2,
            atr: 1.0,
            vwap_dev: 0.01,
            volume_z: 0.5,
        }
    }

    #[test]
    fn bullish_indicators_produce_buy_side_with_stop_below_entry() {
        let pipeline = SignalPipeline::new();
        let candidate = pipeline.evaluate(
            "AAPL",
            &strong_bullish_indicators(),
            Micros::new(100_000_000),
            0.2,
            false,
            None,
            30,
            1_000,
        );
        assert_eq!(candidate.side, Side::Buy);
        assert!(candidate.stop_price.raw() < candidate.entry_ref_price.raw());
        assert!(candidate.target_price.raw() > candidate.entry_ref_price.raw());
    }

    #[test]
    fn edgar_event_tags_trigger_as_edgar() {
        let pipeline = SignalPipeline::new();
        let candidate = pipeline.evaluate(
            "AAPL",
            &strong_bullish_indicators(),
            Micros::new(100_000_000),
            0.5,
            true,
            Some(120),
            30,
            1_000,
        );
        assert_eq!(candidate.trigger_tag, "edgar");
        assert!(candidate.edgar_override);
        assert_eq!(candidate.horizon_minutes, 120);
    }

    #[test]
    fn bar_ts_and_created_at_are_carried_through_unchanged() {
        let pipeline = SignalPipeline::new();
        let candidate = pipeline.evaluate(
            "AAPL",
            &strong_bullish_indicators(),
            Micros::new(100_000_000),
            0.0,
            false,
            None,
            4_500,
            9_999,
        );
        assert_eq!(candidate.bar_ts, 4_500);
        assert_eq!(candidate.created_at, 9_999);
    }
}
