//! Alarm time — the wall-clock target of the scheduler.
//!
//! The trigger comparison works at minute granularity; the pre-connect
//! warm-up works at second granularity via [`AlarmTime::seconds_until`].

use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::error::CurtainError;
use crate::time::Timestamp;

/// Seconds in a day, for wrapping a target that already passed today.
const DAY_SECS: i64 = 24 * 60 * 60;

/// A validated wall-clock time of day, minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    /// Create a validated alarm time.
    ///
    /// # Errors
    ///
    /// Returns [`CurtainError::InvalidAlarmTime`] when `hour > 23` or
    /// `minute > 59`.
    pub fn new(hour: u8, minute: u8) -> Result<Self, CurtainError> {
        if hour > 23 || minute > 59 {
            return Err(CurtainError::InvalidAlarmTime(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Hour component (0–23).
    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Minute component (0–59).
    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Whether `now` falls anywhere within the target minute.
    #[must_use]
    pub fn matches(self, now: Timestamp) -> bool {
        now.hour() == u32::from(self.hour) && now.minute() == u32::from(self.minute)
    }

    /// Seconds from `now` until the start of the target minute.
    ///
    /// A target earlier in the day than `now` is treated as tomorrow, so
    /// the result is always in `0..86400`.
    #[must_use]
    pub fn seconds_until(self, now: Timestamp) -> i64 {
        let target = i64::from(self.hour) * 3600 + i64::from(self.minute) * 60;
        let current = i64::from(now.num_seconds_from_midnight());
        (target - current).rem_euclid(DAY_SECS)
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for AlarmTime {
    type Err = CurtainError;

    /// Parse `"HH:MM"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CurtainError::InvalidAlarmTime(s.to_owned());
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}
