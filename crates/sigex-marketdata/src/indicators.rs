//! Pure indicator functions over a ticker's bar window.
//!
//! Every indicator is a function of the window alone — no hidden state, no
//! wall-clock reads. Each has its own minimum period; below that the whole
//! [`Indicators`] snapshot is `None` rather than a zero or NaN sentinel, so
//! callers suppress signal generation with `insufficient_history` instead of
//! acting on a noisy estimate.

use sigex_schemas::{Bar, Indicators};

const EMA_FAST_PERIOD: usize = 12;
const EMA_SLOW_PERIOD: usize = 26;
const RSI_PERIOD: usize = 14;
const BOLLINGER_PERIOD: usize = 20;
const ATR_PERIOD: usize = 14;
const VOLUME_Z_PERIOD: usize = 20;

const MIN_PERIOD: usize = EMA_SLOW_PERIOD;

/// Compute the full indicator snapshot for a bar window, or `None` if the
/// window is shorter than the largest minimum period among the indicators.
pub fn compute(bars: &[Bar]) -> Option<Indicators> {
    if bars.len() < MIN_PERIOD {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close.raw() as f64 / 1_000_000.0).collect();

    Some(Indicators {
        ema_fast: ema(&closes, EMA_FAST_PERIOD)?,
        ema_slow: ema(&closes, EMA_SLOW_PERIOD)?,
        rsi: rsi(&closes, RSI_PERIOD)?,
        bollinger_position: bollinger_position(&closes, BOLLINGER_PERIOD)?,
        atr: atr(bars, ATR_PERIOD)?,
        vwap_dev: vwap_dev(bars)?,
        volume_z: volume_z(bars, VOLUME_Z_PERIOD)?,
    })
}

fn ema(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    let mut value = seed;
    for &price in &closes[period..] {
        value = price * k + value * (1.0 - k);
    }
    Some(value)
}

fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() < period + 1 {
        return None;
    }
    let window = &closes[closes.len() - period - 1..];
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let diff = pair[1] - pair[0];
        if diff >= 0.0 {
            gain_sum += diff;
        } else {
            loss_sum -= diff;
        }
    }
    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;
    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Position of the latest close within its Bollinger band, in standard
/// deviations: 0 at the mid band, +1/-1 at the upper/lower band.
fn bollinger_position(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() < period {
        return None;
    }
    let window = &closes[closes.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    let variance = window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / period as f64;
    let stdev = variance.sqrt();
    if stdev == 0.0 {
        return Some(0.0);
    }
    let last = *window.last().unwrap();
    Some((last - mean) / stdev)
}

fn atr(bars: &[Bar], period: usize) -> Option<f64> {
    if bars.len() < period + 1 {
        return None;
    }
    let window = &bars[bars.len() - period - 1..];
    let mut true_ranges = Vec::with_capacity(period);
    for pair in window.windows(2) {
        let prev_close = pair[0].close.raw() as f64 / 1_000_000.0;
        let high = pair[1].high.raw() as f64 / 1_000_000.0;
        let low = pair[1].low.raw() as f64 / 1_000_000.0;
        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());
        true_ranges.push(tr);
    }
    Some(true_ranges.iter().sum::<f64>() / period as f64)
}

/// Deviation of the latest close from the session volume-weighted average
/// price, expressed as a fraction of the VWAP.
fn vwap_dev(bars: &[Bar]) -> Option<f64> {
    if bars.is_empty() {
        return None;
    }
    let mut pv_sum = 0.0;
    let mut v_sum = 0.0;
    for bar in bars {
        let typical = (bar.high.raw() + bar.low.raw() + bar.close.raw()) as f64 / 3.0 / 1_000_000.0;
        pv_sum += typical * bar.volume as f64;
        v_sum += bar.volume as f64;
    }
    if v_sum == 0.0 {
        return Some(0.0);
    }
    let vwap = pv_sum / v_sum;
    if vwap == 0.0 {
        return Some(0.0);
    }
    let last_close = bars.last().unwrap().close.raw() as f64 / 1_000_000.0;
    Some((last_close - vwap) / vwap)
}

fn volume_z(bars: &[Bar], period: usize) -> Option<f64> {
    if bars.len() < period {
        return None;
    }
    let window = &bars[bars.len() - period..];
    let volumes: Vec<f64> = window.iter().map(|b| b.volume as f64).collect();
    let mean = volumes.iter().sum::<f64>() / period as f64;
    let variance = volumes.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
    let stdev = variance.sqrt();
    if stdev == 0.0 {
        return Some(0.0);
    }
    let last = *volumes.last().unwrap();
    Some((last - mean) / stdev)
}
