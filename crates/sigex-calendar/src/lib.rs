//! sigex-calendar
//!
//! NYSE session calendar: regular/extended hours, holiday table, EOD
//! flatten window, and trading-day bucketing. Pure deterministic logic —
//! no IO, no wall-clock reads. Callers supply epoch-second UTC timestamps.

mod calendar;

pub use calendar::{SessionCalendar, SessionLabel};
