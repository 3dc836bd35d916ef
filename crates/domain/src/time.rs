//! Wall-clock helpers for authentication bookkeeping.
//!
//! Records carry no timestamps; only the client's own session does.

pub use chrono::TimeDelta;
use chrono::{DateTime, Utc};

/// Moment a session obtained its current token.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Time elapsed since `since`, clamped at zero when the clock went back.
#[must_use]
pub fn elapsed_since(since: Timestamp) -> TimeDelta {
    (now() - since).max(TimeDelta::zero())
}
