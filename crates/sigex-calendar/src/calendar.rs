//! Trading session calendar.
//!
//! Deterministic, pure logic over `chrono-tz`'s `America/New_York` zone — no
//! wall-clock reads, no IO. All inputs/outputs are epoch-second UTC
//! timestamps; DST transitions are handled by the timezone database rather
//! than a fixed offset, so session boundaries stay correct across the
//! March/November changeovers instead of drifting by an hour twice a year.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::America::New_York;

/// Which part of the trading day a timestamp falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLabel {
    /// Before 09:30 ET.
    PreMarket,
    /// 09:30–16:00 ET, a trading day.
    RegularHours,
    /// After 16:00 ET, before midnight.
    AfterHours,
    /// Weekend or NYSE holiday — no session at all.
    Closed,
}

/// `America/New_York`-aware NYSE session calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCalendar;

const RTH_OPEN_SECS: u32 = 9 * 3600 + 30 * 60;
const RTH_CLOSE_SECS: u32 = 16 * 3600;
const EXT_OPEN_SECS: u32 = 4 * 3600;
const EXT_CLOSE_SECS: u32 = 20 * 3600;

impl SessionCalendar {
    fn local(&self, ts: i64) -> DateTime<chrono_tz::Tz> {
        Utc.timestamp_opt(ts, 0).unwrap().with_timezone(&New_York)
    }

    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !is_nyse_holiday(date)
    }

    /// Which part of the session `ts` falls in.
    pub fn session_label(&self, ts: i64) -> SessionLabel {
        let local = self.local(ts);
        if !self.is_trading_day(local.date_naive()) {
            return SessionLabel::Closed;
        }
        let secs_since_midnight = local.num_seconds_from_midnight();
        if secs_since_midnight < RTH_OPEN_SECS {
            SessionLabel::PreMarket
        } else if secs_since_midnight <= RTH_CLOSE_SECS {
            SessionLabel::RegularHours
        } else {
            SessionLabel::AfterHours
        }
    }

    /// `true` during regular trading hours (09:30–16:00 ET) on a trading day.
    pub fn is_rth(&self, ts: i64) -> bool {
        matches!(self.session_label(ts), SessionLabel::RegularHours)
    }

    /// `true` during the wider extended-hours window (04:00–20:00 ET) on a
    /// trading day, inclusive of RTH.
    pub fn is_ext(&self, ts: i64) -> bool {
        let local = self.local(ts);
        if !self.is_trading_day(local.date_naive()) {
            return false;
        }
        let secs = local.num_seconds_from_midnight();
        secs >= EXT_OPEN_SECS && secs <= EXT_CLOSE_SECS
    }

    /// `true` when `ts` falls within `minutes_before_close` of the 16:00 ET
    /// close on a trading day — the EOD flatten window.
    pub fn is_eod_flatten_window(&self, ts: i64, minutes_before_close: u32) -> bool {
        let local = self.local(ts);
        if !self.is_trading_day(local.date_naive()) {
            return false;
        }
        let secs = local.num_seconds_from_midnight();
        let window_start = RTH_CLOSE_SECS.saturating_sub(minutes_before_close * 60);
        secs >= window_start && secs <= RTH_CLOSE_SECS
    }

    /// A stable per-trading-day key (`YYYYMMDD` as an integer) for grouping
    /// daily counters and EOD tasks; derived from the ET calendar date, not
    /// the UTC one, so a 23:00 ET bar and a 01:00 ET bar the same night
    /// never land in different keys due to a UTC midnight crossing.
    pub fn day_key(&self, ts: i64) -> i64 {
        let date = self.local(ts).date_naive();
        date.year() as i64 * 10_000 + date.month() as i64 * 100 + date.day() as i64
    }

    /// Count of trading-session 30s-aligned slots strictly between
    /// `prev_end_ts` and `next_end_ts`, used by the bar store to decide
    /// whether a late/missing bar indicates a real feed gap or is explained
    /// by a weekend/holiday/overnight close.
    pub fn missing_session_slots(&self, prev_end_ts: i64, next_end_ts: i64, interval_secs: i64) -> u32 {
        debug_assert!(interval_secs > 0);
        let mut count = 0u32;
        let mut ts = prev_end_ts + interval_secs;
        while ts < next_end_ts {
            if self.is_rth(ts) {
                count += 1;
            }
            ts += interval_secs;
        }
        count
    }
}

/// NYSE market holidays, 2023–2026 (observed dates).
fn is_nyse_holiday(date: NaiveDate) -> bool {
    const HOLIDAYS: &[(i32, u32, u32)] = &[
        (2023, 1, 2),
        (2023, 1, 16),
        (2023, 2, 20),
        (2023, 4, 7),
        (2023, 5, 29),
        (2023, 6, 19),
        (2023, 7, 4),
        (2023, 9, 4),
        (2023, 11, 23),
        (2023, 12, 25),
        (2024, 1, 1),
        (2024, 1, 15),
        (2024, 2, 19),
        (2024, 3, 29),
        (2024, 5, 27),
        (2024, 6, 19),
        (2024, 7, 4),
        (2024, 9, 2),
        (2024, 11, 28),
        (2024, 12, 25),
        (2025, 1, 1),
        (2025, 1, 20),
        (2025, 2, 17),
        (2025, 4, 18),
        (2025, 5, 26),
        (2025, 6, 19),
        (2025, 7, 4),
        (2025, 9, 1),
        (2025, 11, 27),
        (2025, 12, 25),
        (2026, 1, 1),
        (2026, 1, 19),
        (2026, 2, 16),
        (2026, 4, 3),
        (2026, 5, 25),
        (2026, 6, 19),
        (2026, 7, 3),
        (2026, 9, 7),
        (2026, 11, 26),
        (2026, 12, 25),
    ];
    HOLIDAYS
        .iter()
        .any(|&(y, m, d)| y == date.year() && m == date.month() && d == date.day())
}
