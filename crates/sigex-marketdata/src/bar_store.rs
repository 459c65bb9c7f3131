//! Per-ticker rolling bar window.
//!
//! Single-writer-per-ticker (the ingestor), many-readers. New ticks within
//! an already-open bar update high/low/close/volume; a new 30-second
//! boundary opens a fresh bar and evicts the oldest once retention is
//! exceeded. `ts` must be strictly increasing per ticker — a late bar is
//! discarded, not merged backwards.
//!
//! Gap evaluation absorbs what used to be a standalone bar-feed integrity
//! check: a missing boundary during a trading session is a real gap, but a
//! weekend or holiday gap is expected and must not halt ingestion.

use sigex_calendar::SessionCalendar;
use sigex_schemas::{Bar, BAR_ALIGN_SECONDS, MIN_BAR_WINDOW};
use std::collections::{HashMap, VecDeque};

/// Outcome of appending a bar to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A new bar was opened.
    Opened,
    /// An in-progress bar at the same `ts` was updated in place.
    Merged,
    /// `ts` was not after the most recent bar; discarded, not applied.
    LateDiscarded,
    /// A new bar was opened, but the gap since the previous bar spans more
    /// than `gap_tolerance_bars` missed trading-session slots.
    GapDetected { missing_session_slots: u32 },
}

/// Per-ticker ring buffer of [`Bar`]s bounded to [`MIN_BAR_WINDOW`] entries
/// of slack beyond the configured retention.
pub struct TickerWindow {
    bars: VecDeque<Bar>,
    retention: usize,
    gap_tolerance_bars: u32,
}

impl TickerWindow {
    pub fn new(retention: usize, gap_tolerance_bars: u32) -> Self {
        Self {
            bars: VecDeque::with_capacity(retention.max(MIN_BAR_WINDOW)),
            retention: retention.max(MIN_BAR_WINDOW),
            gap_tolerance_bars,
        }
    }

    pub fn bars(&self) -> &VecDeque<Bar> {
        &self.bars
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Append a new closed-interval bar, or merge an update into the
    /// currently open one.
    pub fn append(&mut self, calendar: &SessionCalendar, bar: Bar) -> AppendOutcome {
        match self.bars.back() {
            None => {
                self.bars.push_back(bar);
                AppendOutcome::Opened
            }
            Some(last) if bar.ts == last.ts => {
                let merged = merge(last, &bar);
                *self.bars.back_mut().unwrap() = merged;
                AppendOutcome::Merged
            }
            Some(last) if bar.ts < last.ts => AppendOutcome::LateDiscarded,
            Some(last) => {
                let missing = calendar.missing_session_slots(last.ts, bar.ts, BAR_ALIGN_SECONDS);
                self.bars.push_back(bar);
                self.evict_excess();
                if missing > self.gap_tolerance_bars {
                    AppendOutcome::GapDetected {
                        missing_session_slots: missing,
                    }
                } else {
                    AppendOutcome::Opened
                }
            }
        }
    }

    fn evict_excess(&mut self) {
        while self.bars.len() > self.retention {
            self.bars.pop_front();
        }
    }

    pub fn has_min_history(&self) -> bool {
        self.bars.len() >= MIN_BAR_WINDOW
    }
}

fn merge(existing: &Bar, tick: &Bar) -> Bar {
    Bar {
        ts: existing.ts,
        open: existing.open,
        high: existing.high.max(tick.high),
        low: existing.low.min(tick.low),
        close: tick.close,
        volume: existing.volume + tick.volume,
        spread_est: tick.spread_est.or(existing.spread_est),
    }
}

/// Owns one [`TickerWindow`] per ticker symbol.
#[derive(Default)]
pub struct BarStore {
    windows: HashMap<String, TickerWindow>,
    retention: usize,
    gap_tolerance_bars: u32,
}

impl BarStore {
    pub fn new(retention: usize, gap_tolerance_bars: u32) -> Self {
        Self {
            windows: HashMap::new(),
            retention,
            gap_tolerance_bars,
        }
    }

    pub fn append(&mut self, calendar: &SessionCalendar, symbol: &str, bar: Bar) -> AppendOutcome {
        let window = self
            .windows
            .entry(symbol.to_string())
            .or_insert_with(|| TickerWindow::new(self.retention, self.gap_tolerance_bars));
        window.append(calendar, bar)
    }

    pub fn window(&self, symbol: &str) -> Option<&TickerWindow> {
        self.windows.get(symbol)
    }
}
