//! Connection session — owns the lifecycle of the single peripheral
//! connection.
//!
//! The session drives the state machine `Disconnected → Connecting →
//! Connected → Resolving → Ready`, with the reverse edge `* →
//! Disconnected` on any disconnect or failure. It is the only owner of the
//! peripheral handle and the resolved endpoint; every transition into
//! `Disconnected` clears both, so no other component can ever act on a
//! stale handle.
//!
//! Platform callbacks reach the session as [`SessionEvent`]s through a
//! single transition entry point, [`ConnectionSession::handle_event`].
//! Delayed steps (scan-window timeout, reconnect back-off) re-validate the
//! session generation before acting, so a stale timer never touches a
//! newer session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use curtain_domain::candidate::{Candidate, CandidateId};
use curtain_domain::connection::ConnectionState;
use curtain_domain::endpoint::ResolvedEndpoint;
#[cfg(test)]
use curtain_domain::error::CurtainError;
use curtain_domain::event::CoreEvent;

use crate::ports::{EventPublisher, Link};
use crate::resolver::{EndpointResolver, ResolveProgress};

/// Timing and policy knobs of the session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bounded duration of one discovery pass.
    pub scan_window: Duration,
    /// Back-off before re-scanning after an unsolicited disconnect.
    pub reconnect_delay: Duration,
    /// Candidates whose name contains this tag (case-insensitive) are
    /// connected to immediately upon discovery.
    pub auto_connect_tag: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan_window: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(3),
            auto_connect_tag: "HC-08".to_owned(),
        }
    }
}

/// Platform callback, translated by the adapter's event pump into a closed
/// tagged variant and fed through [`ConnectionSession::handle_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A peripheral was seen during the current discovery pass.
    Discovered(Candidate),
    /// The identified peripheral dropped its link.
    LinkLost(CandidateId),
}

struct SessionInner {
    state: ConnectionState,
    /// Candidates of the current scan pass, deduplicated by identity.
    candidates: HashMap<CandidateId, Candidate>,
    /// Bumped on every scan start, connect, and disconnect. Delayed steps
    /// capture it when scheduled and no-op when it has moved on.
    generation: u64,
    scanning: bool,
}

/// Owner of the one peripheral connection.
pub struct ConnectionSession<L, P> {
    link: L,
    publisher: P,
    config: SessionConfig,
    inner: Mutex<SessionInner>,
}

impl<L, P> ConnectionSession<L, P>
where
    L: Link + 'static,
    P: EventPublisher + 'static,
{
    /// Create a session around the given link.
    #[must_use]
    pub fn new(link: L, publisher: P, config: SessionConfig) -> Arc<Self> {
        Arc::new(Self {
            link,
            publisher,
            config,
            inner: Mutex::new(SessionInner {
                state: ConnectionState::Disconnected,
                candidates: HashMap::new(),
                generation: 0,
                scanning: false,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True only in the `Ready` state.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lock().state.is_ready()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.lock().state.clone()
    }

    /// The resolved endpoint, present only while `Ready`. Callers must
    /// re-fetch before every use instead of caching — the endpoint is
    /// invalidated the instant a disconnect occurs.
    #[must_use]
    pub fn ready_endpoint(&self) -> Option<ResolvedEndpoint> {
        self.lock().state.endpoint().cloned()
    }

    /// Candidates seen so far in the current discovery pass.
    #[must_use]
    pub fn candidates(&self) -> Vec<Candidate> {
        self.lock().candidates.values().cloned().collect()
    }

    /// The transport link, for components that route through the session.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Begin a discovery pass.
    ///
    /// No-op outside `Disconnected` or while a pass is already running. A
    /// `TransportUnavailable` failure is reported as a status event and
    /// not retried without user action.
    pub async fn start_scan(self: &Arc<Self>) {
        let generation = {
            let mut inner = self.lock();
            if !matches!(inner.state, ConnectionState::Disconnected) || inner.scanning {
                tracing::debug!(state = inner.state.name(), "scan request ignored");
                return;
            }
            inner.generation += 1;
            inner.candidates.clear();
            inner.scanning = true;
            inner.generation
        };

        match self.link.start_scan().await {
            Ok(()) => {
                tracing::info!(window_secs = self.config.scan_window.as_secs(), "scan started");
                self.publish(CoreEvent::ScanStarted).await;

                let session = Arc::clone(self);
                tokio::spawn(async move {
                    tokio::time::sleep(session.config.scan_window).await;
                    session.finish_scan(generation).await;
                });
            }
            Err(err) => {
                self.lock().scanning = false;
                tracing::warn!(%err, "scan not started");
                self.publish(CoreEvent::TransportUnavailable).await;
            }
        }
    }

    /// End the pass started at `generation`, unless a connection has
    /// superseded it.
    async fn finish_scan(self: &Arc<Self>, generation: u64) {
        let candidates = {
            let mut inner = self.lock();
            if inner.generation != generation || !inner.scanning {
                return;
            }
            inner.scanning = false;
            inner.candidates.len()
        };

        if let Err(err) = self.link.stop_scan().await {
            tracing::debug!(%err, "failed to stop scan");
        }
        // No candidates found within the window is not an error.
        tracing::info!(candidates, "scan complete");
        self.publish(CoreEvent::ScanComplete { candidates }).await;
    }

    /// Single transition entry point for platform callbacks.
    pub async fn handle_event(self: &Arc<Self>, event: SessionEvent) {
        match event {
            SessionEvent::Discovered(candidate) => self.on_discovered(candidate).await,
            SessionEvent::LinkLost(id) => self.on_link_lost(&id).await,
        }
    }

    async fn on_discovered(self: &Arc<Self>, candidate: Candidate) {
        let auto_connect = {
            let mut inner = self.lock();
            if !inner.scanning {
                return;
            }
            if inner.candidates.contains_key(&candidate.id) {
                // Re-discovery within one pass: refresh, no duplicate entry.
                inner.candidates.insert(candidate.id.clone(), candidate);
                return;
            }
            inner
                .candidates
                .insert(candidate.id.clone(), candidate.clone());
            candidate.matches_tag(&self.config.auto_connect_tag)
        };

        tracing::debug!(candidate = %candidate.label(), rssi = ?candidate.rssi, "discovered");
        self.publish(CoreEvent::CandidateDiscovered {
            candidate: candidate.clone(),
        })
        .await;

        if auto_connect {
            tracing::info!(id = %candidate.id, "name matches auto-connect tag");
            self.publish(CoreEvent::AutoConnect {
                id: candidate.id.clone(),
            })
            .await;
            self.connect(candidate.id).await;
        }
    }

    /// Connect to a candidate. Valid only from `Disconnected`; the current
    /// scan pass is superseded.
    ///
    /// On failure the session returns to `Disconnected` and discovery
    /// restarts — a failed attempt never retries the same candidate
    /// directly.
    pub async fn connect(self: &Arc<Self>, id: CandidateId) {
        let generation = {
            let mut inner = self.lock();
            if !matches!(inner.state, ConnectionState::Disconnected) {
                tracing::debug!(%id, state = inner.state.name(), "connect request ignored");
                return;
            }
            inner.generation += 1;
            inner.scanning = false;
            inner.candidates.clear();
            inner.state = ConnectionState::Connecting { id: id.clone() };
            inner.generation
        };

        if let Err(err) = self.link.stop_scan().await {
            tracing::debug!(%err, "failed to stop scan");
        }
        self.publish(CoreEvent::Connecting { id: id.clone() }).await;

        match self.link.connect(&id).await {
            Ok(()) => {
                {
                    let mut inner = self.lock();
                    if inner.generation != generation {
                        return;
                    }
                    inner.state = ConnectionState::Connected { id: id.clone() };
                }
                tracing::info!(%id, "connected");
                self.publish(CoreEvent::Connected { id: id.clone() }).await;
                self.resolve(generation, id).await;
            }
            Err(err) => {
                tracing::warn!(%id, %err, "connect failed");
                self.publish(CoreEvent::ConnectFailed {
                    id,
                    reason: err.to_string(),
                })
                .await;
                {
                    let mut inner = self.lock();
                    if inner.generation != generation {
                        return;
                    }
                    inner.generation += 1;
                    inner.state = ConnectionState::Disconnected;
                }
                if let Err(err) = self.link.release().await {
                    tracing::debug!(%err, "failed to release peripheral");
                }
                self.start_scan().await;
            }
        }
    }

    /// Walk the advertised service tree looking for the command endpoint.
    /// Runs once per physical connection establishment.
    async fn resolve(self: &Arc<Self>, generation: u64, id: CandidateId) {
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                return;
            }
            inner.state = ConnectionState::Resolving { id: id.clone() };
        }

        let reports = match self.link.discover_services().await {
            Ok(reports) => reports,
            Err(err) => {
                // The connection is in an unknown state; treat it as lost.
                tracing::warn!(%err, "service discovery failed");
                self.on_link_lost(&id).await;
                return;
            }
        };

        let mut resolver = EndpointResolver::new(reports.len());
        let mut progress = ResolveProgress::NotFound;
        for report in &reports {
            progress = resolver.ingest(report);
            if !matches!(progress, ResolveProgress::Pending) {
                break;
            }
        }

        match progress {
            ResolveProgress::Found(endpoint) => {
                {
                    let mut inner = self.lock();
                    if inner.generation != generation {
                        return;
                    }
                    inner.state = ConnectionState::Ready {
                        id,
                        endpoint: endpoint.clone(),
                    };
                }
                tracing::info!(characteristic = %endpoint.characteristic, "endpoint resolved");
                self.publish(CoreEvent::Ready { endpoint }).await;
            }
            ResolveProgress::NotWritable(endpoint) => {
                self.demote_to_connected(generation, id).await;
                tracing::warn!(characteristic = %endpoint.characteristic, "endpoint not writable");
                self.publish(CoreEvent::EndpointNotWritable).await;
            }
            ResolveProgress::NotFound | ResolveProgress::Pending => {
                // The session stays connected; higher layers see not-ready.
                self.demote_to_connected(generation, id).await;
                tracing::warn!("command endpoint not found");
                self.publish(CoreEvent::EndpointNotFound).await;
            }
        }
    }

    async fn demote_to_connected(&self, generation: u64, id: CandidateId) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }
        inner.state = ConnectionState::Connected { id };
    }

    /// Unsolicited disconnect: clear every session-scoped handle, fall
    /// back to `Disconnected`, and re-invoke discovery after the back-off
    /// delay. The same identity may not be immediately connectable, so the
    /// retry goes through discovery rather than a direct reconnect.
    async fn on_link_lost(self: &Arc<Self>, id: &CandidateId) {
        let generation = {
            let mut inner = self.lock();
            if inner.state.peripheral() != Some(id) {
                tracing::trace!(%id, "disconnect event for unrelated peripheral");
                return;
            }
            inner.generation += 1;
            inner.state = ConnectionState::Disconnected;
            inner.scanning = false;
            inner.candidates.clear();
            inner.generation
        };

        if let Err(err) = self.link.release().await {
            tracing::debug!(%err, "failed to release peripheral");
        }

        let delay = self.config.reconnect_delay;
        tracing::warn!(%id, delay_secs = delay.as_secs(), "link lost, rescan scheduled");
        self.publish(CoreEvent::Disconnected).await;
        self.publish(CoreEvent::ReconnectScheduled {
            delay_secs: delay.as_secs(),
        })
        .await;

        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if session.lock().generation != generation {
                return;
            }
            session.start_scan().await;
        });
    }

    async fn publish(&self, event: CoreEvent) {
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(%err, "failed to publish event");
        }
    }
}
