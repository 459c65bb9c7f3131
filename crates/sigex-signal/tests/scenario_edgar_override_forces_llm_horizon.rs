use sigex_schemas::{Indicators, Micros, RegimeLabel, Side};
use sigex_signal::SignalPipeline;

#[test]
fn scenario_edgar_override_forces_llm_horizon_and_sentiment_signed_bonus() {
    let indicators = Indicators {
        ema_fast: 100.2,
        ema_slow: 100.0,
        rsi: 52.0,
        bollinger_position: 0.1,
        atr: 0.5,
        vwap_dev: 0.0,
        volume_z: 0.2,
    };

    let pipeline = SignalPipeline::new();
    let candidate = pipeline.evaluate(
        "AAPL",
        &indicators,
        Micros::new(150_000_000),
        0.6,
        true,
        Some(180),
        1_700_000_030,
        1_700_000_100,
    );

    // Weak tech signal (sideways regime, near-flat indicators) but a strong
    // positive EDGAR-sourced sentiment should still push the blended score
    // positive and pick the LLM's own horizon over the regime default.
    assert_eq!(candidate.regime, RegimeLabel::Sideways);
    assert_eq!(candidate.side, Side::Buy);
    assert!(candidate.base_score > 0.0);
    assert_eq!(candidate.horizon_minutes, 180);
    assert_eq!(candidate.trigger_tag, "edgar");
    assert!(candidate.edgar_override);
    assert_eq!(candidate.bar_ts, 1_700_000_030);
}
