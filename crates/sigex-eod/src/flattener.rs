//! EOD position flattener and opening-auction cleanup.
//!
//! Fail-closed/idempotent-repeated-run semantics adapted from the arm
//! state's boot discipline: a flatten attempt for a symbol already
//! flattened this window is a no-op rather than a second closing order,
//! the same way a persisted `Armed` state is never trusted across a
//! boundary without fresh confirmation.

use std::collections::HashSet;

use sigex_schemas::{parse_price_micros, BrokerPosition, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOrder {
    pub symbol: String,
    pub side: Side,
    pub qty: i64,
}

/// Tracks which symbols have already been issued a closing order within
/// the current flatten window, so repeated calls are safe.
pub struct EodFlattener {
    window_key: String,
    flattened_this_window: HashSet<String>,
}

impl Default for EodFlattener {
    fn default() -> Self {
        Self::new()
    }
}

impl EodFlattener {
    pub fn new() -> Self {
        Self {
            window_key: String::new(),
            flattened_this_window: HashSet::new(),
        }
    }

    /// `true` when `now` falls in `[close - minutes_before_close*60, close]`.
    pub fn is_in_flatten_window(now: i64, close_ts: i64, minutes_before_close: i64) -> bool {
        now >= close_ts - minutes_before_close * 60 && now <= close_ts
    }

    /// `true` when `now` falls in the opening-auction cleanup window, e.g.
    /// 09:25-09:35 exchange time for a 09:30 open.
    pub fn is_in_opg_cleanup_window(now: i64, open_ts: i64, minutes_before_open: i64, minutes_after_open: i64) -> bool {
        now >= open_ts - minutes_before_open * 60 && now <= open_ts + minutes_after_open * 60
    }

    /// Resets the flattened-symbol set when the window key (day or session
    /// label) changes, so a new EOD window starts clean.
    fn roll_window(&mut self, window_key: &str) {
        if self.window_key != window_key {
            self.window_key = window_key.to_string();
            self.flattened_this_window.clear();
        }
    }

    /// Builds the set of closing orders for the given open positions,
    /// skipping any symbol already flattened this window. Marks every
    /// returned symbol as flattened before returning, so a second call
    /// within the same window (and the same `window_key`) returns nothing
    /// for those symbols even if the broker hasn't confirmed the close yet.
    pub fn plan_flatten(&mut self, window_key: &str, positions: &[BrokerPosition]) -> Vec<FlattenOrder> {
        self.roll_window(window_key);

        let mut orders = Vec::new();
        for position in positions {
            if self.flattened_this_window.contains(&position.symbol) {
                continue;
            }
            let qty_micros = match parse_price_micros(&position.qty, "qty") {
                Ok(q) => q,
                Err(_) => continue,
            };
            let qty = qty_micros / 1_000_000;
            if qty == 0 {
                continue;
            }
            let side = if qty > 0 { Side::Sell } else { Side::Buy };
            orders.push(FlattenOrder {
                symbol: position.symbol.clone(),
                side,
                qty: qty.abs(),
            });
            self.flattened_this_window.insert(position.symbol.clone());
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(symbol: &str, qty: &str) -> BrokerPosition {
        BrokerPosition {
            symbol: symbol.to_string(),
            qty: qty.to_string(),
            avg_price: "100.000000".to_string(),
        }
    }

    #[test]
    fn flatten_window_bounds_are_inclusive() {
        let close_ts = 10_000;
        assert!(EodFlattener::is_in_flatten_window(9_700, close_ts, 5));
        assert!(EodFlattener::is_in_flatten_window(10_000, close_ts, 5));
        assert!(!EodFlattener::is_in_flatten_window(9_699, close_ts, 5));
        assert!(!EodFlattener::is_in_flatten_window(10_001, close_ts, 5));
    }

    #[test]
    fn opg_cleanup_window_bounds_an_open_range() {
        let open_ts = 20_000;
        assert!(!EodFlattener::is_in_opg_cleanup_window(19_000, open_ts, 5, 5));
        assert!(EodFlattener::is_in_opg_cleanup_window(19_700, open_ts, 5, 5));
        assert!(EodFlattener::is_in_opg_cleanup_window(20_300, open_ts, 5, 5));
        assert!(!EodFlattener::is_in_opg_cleanup_window(20_400, open_ts, 5, 5));
    }

    #[test]
    fn long_position_flattens_with_a_sell_order() {
        let mut flattener = EodFlattener::new();
        let orders = flattener.plan_flatten("2026-08-01", &[position("AAPL", "100.000000")]);
        assert_eq!(orders, vec![FlattenOrder { symbol: "AAPL".into(), side: Side::Sell, qty: 100 }]);
    }

    #[test]
    fn short_position_flattens_with_a_buy_order() {
        let mut flattener = EodFlattener::new();
        let orders = flattener.plan_flatten("2026-08-01", &[position("SOXS", "-50.000000")]);
        assert_eq!(orders, vec![FlattenOrder { symbol: "SOXS".into(), side: Side::Buy, qty: 50 }]);
    }

    #[test]
    fn repeated_call_within_the_same_window_is_a_no_op_for_already_flattened_symbols() {
        let mut flattener = EodFlattener::new();
        let positions = [position("AAPL", "100.000000")];
        let first = flattener.plan_flatten("2026-08-01", &positions);
        assert_eq!(first.len(), 1);

        let second = flattener.plan_flatten("2026-08-01", &positions);
        assert!(second.is_empty());
    }

    #[test]
    fn a_new_window_key_resets_flattened_tracking() {
        let mut flattener = EodFlattener::new();
        let positions = [position("AAPL", "100.000000")];
        flattener.plan_flatten("2026-08-01", &positions);

        let next_day = flattener.plan_flatten("2026-08-02", &positions);
        assert_eq!(next_day.len(), 1);
    }

    #[test]
    fn zero_quantity_position_is_skipped() {
        let mut flattener = EodFlattener::new();
        let orders = flattener.plan_flatten("2026-08-01", &[position("AAPL", "0.000000")]);
        assert!(orders.is_empty());
    }
}
