//! sigex-eod
//!
//! End-of-day position flattener and opening-auction cleanup. Grounded on
//! the arm state's fail-closed, explicit-transition-only discipline for
//! idempotent repeated runs, composed with the broker adapter's
//! `get_positions`/`submit_market_order` pair this crate adapts from for
//! the actual closing-order submission.

mod flattener;
mod scheduler;

pub use flattener::{EodFlattener, FlattenOrder};
pub use scheduler::{
    EodScheduler, FlattenAttempt, EOD_FLATTEN_MINUTES, OPG_CLEANUP_MINUTES_AFTER_OPEN,
    OPG_CLEANUP_MINUTES_BEFORE_OPEN,
};
