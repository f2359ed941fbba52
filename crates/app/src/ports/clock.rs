//! Clock port — injectable wall-clock source for the alarm scheduler.

use curtain_domain::time::Timestamp;

/// Wall-clock time source.
///
/// The scheduler compares against this rather than calling the system
/// clock directly, so tests can drive time explicitly.
pub trait Clock: Send + Sync {
    /// The current local time.
    fn now(&self) -> Timestamp;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        curtain_domain::time::now()
    }
}
