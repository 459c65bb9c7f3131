//! Signal mixer: blends technical and sentiment scores under regime-dependent
//! weights, with an EDGAR override bonus.

use sigex_schemas::RegimeLabel;

const EDGAR_BONUS: f64 = 0.1;
const DEFAULT_HORIZON_MINUTES: u32 = 60;

/// Regime-dependent (tech_weight, sentiment_weight) pairs. Always sum to 1.
fn weights(regime: RegimeLabel) -> (f64, f64) {
    match regime {
        RegimeLabel::Trend => (0.75, 0.25),
        RegimeLabel::VolSpike => (0.30, 0.70),
        RegimeLabel::MeanRevert => (0.60, 0.40),
        RegimeLabel::Sideways => (0.50, 0.50),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixOutcome {
    pub score: f64,
    pub horizon_minutes: u32,
}

/// Mix technical and sentiment scores into a single candidate score.
///
/// `edgar_event` adds a small bonus in the direction of `sentiment` and, if
/// `llm_horizon_minutes` is present, forces the horizon to the LLM's value
/// instead of the regime default.
pub fn mix(
    tech: f64,
    sentiment: f64,
    regime: RegimeLabel,
    edgar_event: bool,
    llm_horizon_minutes: Option<u32>,
) -> MixOutcome {
    let (tech_w, sent_w) = weights(regime);
    let mut score = tech_w * tech + sent_w * sentiment;

    if edgar_event {
        score += EDGAR_BONUS * sentiment.signum();
    }
    score = score.clamp(-1.0, 1.0);

    let horizon_minutes = if edgar_event {
        llm_horizon_minutes.unwrap_or(DEFAULT_HORIZON_MINUTES)
    } else {
        DEFAULT_HORIZON_MINUTES
    };

    MixOutcome {
        score,
        horizon_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_regime_weights_tech_heavily() {
        let out = mix(0.8, 0.0, RegimeLabel::Trend, false, None);
        assert!((out.score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn vol_spike_regime_weights_sentiment_heavily() {
        let out = mix(0.0, 0.8, RegimeLabel::VolSpike, false, None);
        assert!((out.score - 0.56).abs() < 1e-9);
    }

    #[test]
    fn edgar_bonus_follows_sentiment_sign() {
        let positive = mix(0.0, 0.5, RegimeLabel::Sideways, true, None);
        let negative = mix(0.0, -0.5, RegimeLabel::Sideways, true, None);
        assert!(positive.score > 0.25);
        assert!(negative.score < -0.25);
    }

    #[test]
    fn edgar_event_forces_llm_horizon() {
        let out = mix(0.2, 0.2, RegimeLabel::Sideways, true, Some(240));
        assert_eq!(out.horizon_minutes, 240);
    }

    #[test]
    fn non_edgar_event_uses_default_horizon() {
        let out = mix(0.2, 0.2, RegimeLabel::Sideways, false, Some(240));
        assert_eq!(out.horizon_minutes, DEFAULT_HORIZON_MINUTES);
    }

    #[test]
    fn score_is_clamped_to_unit_range() {
        let out = mix(1.0, 1.0, RegimeLabel::Sideways, true, None);
        assert!(out.score <= 1.0);
    }
}
