//! Technical score: a weighted combination of normalized indicator signals,
//! clamped to `[-1, 1]`.

use sigex_schemas::Indicators;

const W_MOMENTUM: f64 = 0.35;
const W_VOLATILITY: f64 = 0.15;
const W_VOLUME: f64 = 0.15;
const W_BOLLINGER: f64 = 0.20;
const W_RSI: f64 = 0.15;

/// Compute the technical score for a single indicator snapshot.
pub fn score(ind: &Indicators) -> f64 {
    let momentum = ((ind.ema_fast - ind.ema_slow) / ind.ema_slow.abs().max(1e-9)).clamp(-1.0, 1.0);
    let volatility = (-ind.atr / ind.ema_slow.abs().max(1e-9)).clamp(-1.0, 1.0);
    let volume = (ind.volume_z / 3.0).clamp(-1.0, 1.0);
    let bollinger = ind.bollinger_position.clamp(-1.0, 1.0);
    // RSI centered at 50: >50 bullish, <50 bearish.
    let rsi_component = ((ind.rsi - 50.0) / 50.0).clamp(-1.0, 1.0);

    let raw = W_MOMENTUM * momentum
        + W_VOLATILITY * volatility
        + W_VOLUME * volume
        + W_BOLLINGER * bollinger
        + W_RSI * rsi_component;

    raw.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Indicators {
        Indicators {
            ema_fast: 100.0,
            ema_slow: 100.0,
            rsi: 50.0,
            bollinger_position: 0.0,
            atr: 0.0,
            vwap_dev: 0.0,
            volume_z: 0.0,
        }
    }

    #[test]
    fn neutral_indicators_score_near_zero() {
        let s = score(&base());
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn bullish_momentum_and_rsi_score_positive() {
        let mut ind = base();
        ind.ema_fast = 103.0;
        ind.rsi = 65.0;
        ind.bollinger_position = 0.8;
        assert!(score(&ind) > 0.0);
    }

    #[test]
    fn bearish_indicators_score_negative() {
        let mut ind = base();
        ind.ema_fast = 97.0;
        ind.rsi = 30.0;
        ind.bollinger_position = -0.8;
        assert!(score(&ind) < 0.0);
    }

    #[test]
    fn score_never_exceeds_unit_bounds() {
        let mut ind = base();
        ind.ema_fast = 1000.0;
        ind.rsi = 100.0;
        ind.bollinger_position = 10.0;
        ind.volume_z = 100.0;
        let s = score(&ind);
        assert!((-1.0..=1.0).contains(&s));
    }
}
