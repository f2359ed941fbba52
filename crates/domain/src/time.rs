//! Time and timestamp helpers.

use chrono::{DateTime, Local};

/// Local wall-clock timestamp — alarms are set against the wall clock the
/// user sees, not UTC.
pub type Timestamp = DateTime<Local>;

/// Return the current local time.
#[must_use]
pub fn now() -> Timestamp {
    Local::now()
}
