//! Rule-based regime classification.
//!
//! Pure function of an [`Indicators`] snapshot: no IO, no wall-clock reads.
//! Thresholds are conservative defaults grounded on the weighting ranges the
//! mixer itself uses per regime — they are not exposed as config because the
//! regime boundaries are a modeling choice, not an operational knob.

use sigex_schemas::{Indicators, Regime, RegimeLabel};

const TREND_EMA_GAP: f64 = 0.004;
const TREND_MIN_ADX_PROXY: f64 = 0.6;
const VOL_SPIKE_VOLUME_Z: f64 = 2.0;
const VOL_SPIKE_ATR_RATIO: f64 = 0.02;
const MEAN_REVERT_RSI_HIGH: f64 = 70.0;
const MEAN_REVERT_RSI_LOW: f64 = 30.0;

/// Classify the current regime from indicators alone.
///
/// `adx_proxy` approximates trend strength without a dedicated ADX
/// indicator: the absolute Bollinger position, which grows as price pushes
/// away from its rolling mean in a sustained direction.
pub fn classify(ind: &Indicators) -> Regime {
    let ema_gap = (ind.ema_fast - ind.ema_slow) / ind.ema_slow.abs().max(1e-9);
    let adx_proxy = ind.bollinger_position.abs();

    if ema_gap.abs() >= TREND_EMA_GAP && adx_proxy >= TREND_MIN_ADX_PROXY {
        let confidence = (adx_proxy / 3.0).min(1.0);
        return Regime {
            label: RegimeLabel::Trend,
            confidence,
        };
    }

    let atr_ratio = ind.atr / ind.ema_slow.abs().max(1e-9);
    if ind.volume_z >= VOL_SPIKE_VOLUME_Z && atr_ratio >= VOL_SPIKE_ATR_RATIO {
        let confidence = (ind.volume_z / 4.0).min(1.0);
        return Regime {
            label: RegimeLabel::VolSpike,
            confidence,
        };
    }

    if ind.rsi >= MEAN_REVERT_RSI_HIGH || ind.rsi <= MEAN_REVERT_RSI_LOW {
        let distance = (ind.rsi - 50.0).abs() / 50.0;
        return Regime {
            label: RegimeLabel::MeanRevert,
            confidence: distance.min(1.0),
        };
    }

    Regime {
        label: RegimeLabel::Sideways,
        confidence: 1.0 - adx_proxy.min(1.0),
    }
}
