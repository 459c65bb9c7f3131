//! Typed row builders for this pipeline's four write-only audit tables.
//!
//! The writer never reads these rows back for a decision; they exist for
//! operational dashboards and post-hoc reconstruction only. Each builder
//! returns the `serde_json::Value` payload [`AuditWriter::append`] expects,
//! keyed the way the persisted table is named.

use serde_json::{json, Value};

use sigex_schemas::{CandidateSignal, SuppressReason};

/// One row per candidate signal: emitted ones and suppressed ones both get
/// a row, with `reason_or_emit` distinguishing the two.
pub fn signal_row(candidate: &CandidateSignal, reason_or_emit: Result<(), SuppressReason>) -> Value {
    json!({
        "ts": candidate.created_at,
        "ticker": candidate.ticker,
        "regime": format!("{:?}", candidate.regime),
        "tech": candidate.tech_score,
        "sentiment": candidate.sent_score,
        "score": candidate.base_score,
        "reason_or_emit": match reason_or_emit {
            Ok(()) => "emit".to_string(),
            Err(reason) => reason.to_string(),
        },
        "horizon_min": candidate.horizon_minutes,
        "override": candidate.edgar_override,
    })
}

/// One row per submitted order, keyed by the dispatcher's idempotency key.
pub fn order_row(
    ts: i64,
    ticker: &str,
    side: &str,
    qty: i64,
    entry_micros: i64,
    stop_micros: i64,
    target_micros: i64,
    idem_key: &str,
    status: &str,
) -> Value {
    json!({
        "ts": ts,
        "ticker": ticker,
        "side": side,
        "qty": qty,
        "entry": entry_micros,
        "stop": stop_micros,
        "target": target_micros,
        "idem_key": idem_key,
        "status": status,
    })
}

/// One row per fill, linked back to its order by `order_id`.
pub fn fill_row(order_id: &str, ts: i64, price_micros: i64, qty: i64) -> Value {
    json!({
        "order_id": order_id,
        "ts": ts,
        "price": price_micros,
        "qty": qty,
    })
}

/// One row per trading day, written once at end-of-day.
pub fn metrics_daily_row(date: &str, trades: u32, winrate: f64, pnl_micros: i64, drawdown_pct: f64, llm_calls: u32) -> Value {
    json!({
        "date": date,
        "trades": trades,
        "winrate": winrate,
        "pnl": pnl_micros,
        "drawdown": drawdown_pct,
        "llm_calls": llm_calls,
    })
}
