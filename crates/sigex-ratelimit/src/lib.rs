//! sigex-ratelimit
//!
//! Token bucket rate limiting for the quote provider's three quota tiers
//! (A, B, Reserve). Pure, deterministic, and non-blocking: callers pass an
//! explicit `now` and get an immediate allow/deny back, never a wait.

mod bucket;

pub use bucket::{ConsumeOutcome, TokenBucket, TokenBucketSet};
