//! Event publisher port — status event sink for the excluded UI layer.

use std::future::Future;

use curtain_domain::error::CurtainError;
use curtain_domain::event::CoreEvent;

/// Publishes status events to whoever is listening.
///
/// Publishing must succeed even when nobody listens — the core's state
/// machines never assume an attached observer exists.
pub trait EventPublisher: Send + Sync {
    /// Publish one event.
    fn publish(&self, event: CoreEvent) -> impl Future<Output = Result<(), CurtainError>> + Send;
}
