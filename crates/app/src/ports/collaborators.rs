//! Collaborator ports — presentation facilities outside the core.
//!
//! Rendering, sound, and notification delivery are explicitly out of
//! scope; the scheduler only tells these collaborators *when* to act.

use curtain_domain::alarm::AlarmTime;

/// Local alert presentation (sound/visual), started on trigger and stopped
/// by the 30-second auto-stop timer or an explicit cancel.
pub trait AlertSink: Send + Sync {
    /// Begin presenting the alert. Idempotent.
    fn start(&self);
    /// End the alert presentation. Idempotent, callable when not started.
    fn stop(&self);
}

/// External notification scheduling facility.
///
/// The core hands over the target time at arm time and removes the pending
/// request at cancel time. The notification's user-tap action feeds the
/// [`ExternalTriggerBridge`](crate::bridge::ExternalTriggerBridge).
pub trait NotificationGateway: Send + Sync {
    /// Schedule a notification for the target time, replacing any pending
    /// one.
    fn schedule(&self, target: AlarmTime);
    /// Remove any pending notification request. Idempotent.
    fn clear(&self);
}
