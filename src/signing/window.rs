//! Validity windows for signed URLs.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Epoch-second bounds during which a signed URL is accepted.
///
/// Either bound may be absent. Absent bounds are left out of both the token
/// input and the query string, so `time=0` and "no time" sign differently.
///
/// The window is always built by the caller; nothing in the signing path
/// reads the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityWindow {
    /// Start of validity (`time` parameter)
    pub current_time: Option<i64>,

    /// End of validity (`until` parameter)
    pub until_time: Option<i64>,
}

impl ValidityWindow {
    /// Window without bounds.
    pub const fn unbounded() -> Self {
        Self {
            current_time: None,
            until_time: None,
        }
    }

    /// Window with both bounds.
    pub const fn between(current_time: i64, until_time: i64) -> Self {
        Self {
            current_time: Some(current_time),
            until_time: Some(until_time),
        }
    }

    /// Window with only a start time.
    pub const fn starting_at(current_time: i64) -> Self {
        Self {
            current_time: Some(current_time),
            until_time: None,
        }
    }

    /// Window with only an end time.
    pub const fn until(until_time: i64) -> Self {
        Self {
            current_time: None,
            until_time: Some(until_time),
        }
    }

    /// Window between two points in time, truncated to whole seconds.
    pub fn from_system_times(start: SystemTime, end: SystemTime) -> Self {
        Self::between(epoch_seconds(start), epoch_seconds(end))
    }

    /// Window that opens at `start` and stays valid for `ttl`.
    pub fn with_ttl(start: SystemTime, ttl: Duration) -> Self {
        let current_time = epoch_seconds(start);
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self::between(current_time, current_time.saturating_add(ttl))
    }

    /// True when neither bound is present.
    pub fn is_unbounded(&self) -> bool {
        self.current_time.is_none() && self.until_time.is_none()
    }
}

/// Seconds since the Unix epoch; negative for times before it.
pub fn epoch_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => -i64::try_from(before.duration().as_secs()).unwrap_or(i64::MAX),
    }
}
