//! Timestamps as the store keeps them.
//!
//! Postgres keeps microseconds, so every stamp is truncated to that
//! precision before it is written; a value read back compares equal to the
//! value returned at write time.

use chrono::{DateTime, Duration, SubsecRound, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A stamp strictly later than `prev`, even when the wall clock is not.
pub fn stamp_after(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > prev {
        now
    } else {
        prev + Duration::microseconds(1)
    }
}
