//! Signal dispatcher — sends the open command with a redundant burst.
//!
//! The wireless module may be dozing after idle periods, and a bare write
//! can silently fail without prior bus activity. Dispatch therefore runs
//! in two phases: a wake probe with a settle delay, then a burst of three
//! independent writes. Each delay is a scheduled continuation, and
//! readiness is re-validated before every step — a write never proceeds
//! once the session has left `Ready`.

use std::sync::Arc;
use std::time::Duration;

use curtain_domain::command::{BURST_ATTEMPTS, OPEN_COMMAND};
#[cfg(test)]
use curtain_domain::error::CurtainError;
use curtain_domain::event::CoreEvent;

use crate::ports::{EventPublisher, Link};
use crate::session::ConnectionSession;

/// Timing knobs of a dispatch burst.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Settle delay between the wake probe and the first write.
    pub settle: Duration,
    /// Spacing between consecutive burst writes.
    pub spacing: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            spacing: Duration::from_millis(300),
        }
    }
}

/// Sends the command value to the resolved endpoint.
///
/// Never caches the endpoint: it is re-fetched from the session before
/// every write, because a disconnect invalidates it at any moment.
/// Multiple dispatches may run concurrently; bursts interleave but each
/// write is independent.
pub struct SignalDispatcher<L, P> {
    session: Arc<ConnectionSession<L, P>>,
    publisher: P,
    config: DispatchConfig,
}

impl<L, P> SignalDispatcher<L, P>
where
    L: Link + 'static,
    P: EventPublisher + 'static,
{
    /// Create a dispatcher routing through the given session.
    #[must_use]
    pub fn new(
        session: Arc<ConnectionSession<L, P>>,
        publisher: P,
        config: DispatchConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            session,
            publisher,
            config,
        })
    }

    /// Send the open command.
    ///
    /// A no-op (status event only) when the session is not `Ready`.
    /// Individual write failures are reported but never abort the
    /// remaining attempts of the burst.
    pub async fn dispatch(&self) {
        let Some(endpoint) = self.session.ready_endpoint() else {
            tracing::info!("dispatch skipped, connection not ready");
            self.publish(CoreEvent::DispatchSkipped).await;
            return;
        };

        tracing::info!("dispatching open command");
        self.publish(CoreEvent::DispatchStarted).await;

        // Wake phase: best-effort bus activity before the burst.
        if let Err(err) = self.session.link().probe(&endpoint).await {
            tracing::debug!(%err, "wake probe failed");
        }
        tokio::time::sleep(self.config.settle).await;

        for attempt in 1..=BURST_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(self.config.spacing).await;
            }

            // Re-validate: a disconnect may have landed during the delay.
            let Some(endpoint) = self.session.ready_endpoint() else {
                tracing::warn!(attempt, "session left ready mid-burst");
                self.publish(CoreEvent::DispatchAborted).await;
                return;
            };
            let Some(kind) = endpoint.caps.preferred_write() else {
                tracing::warn!("endpoint carries no write capability");
                self.publish(CoreEvent::EndpointNotWritable).await;
                return;
            };

            match self
                .session
                .link()
                .write(&endpoint, kind, &OPEN_COMMAND)
                .await
            {
                Ok(()) => {
                    tracing::debug!(attempt, ?kind, "burst write issued");
                    self.publish(CoreEvent::WriteIssued { attempt }).await;
                }
                Err(err) => {
                    tracing::warn!(attempt, %err, "burst write failed");
                    self.publish(CoreEvent::WriteFailed {
                        attempt,
                        reason: err.to_string(),
                    })
                    .await;
                }
            }
        }
    }

    async fn publish(&self, event: CoreEvent) {
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(%err, "failed to publish event");
        }
    }
}
