//! Link port — the wireless transport as seen by the application core.
//!
//! The session owns exactly one link and drives it through this trait; the
//! BLE adapter provides the concrete implementation. Discovery and
//! disconnect *events* flow the other way, translated by the adapter's
//! event pump into [`SessionEvent`](crate::session::SessionEvent)s.

use std::future::Future;

use curtain_domain::candidate::CandidateId;
use curtain_domain::endpoint::{ResolvedEndpoint, ServiceReport, WriteKind};
use curtain_domain::error::CurtainError;

/// Outbound operations on the wireless transport.
pub trait Link: Send + Sync {
    /// Begin an active discovery pass.
    ///
    /// Must fail with [`CurtainError::TransportUnavailable`] when the radio
    /// is absent, off, or unauthorized — never silently do nothing.
    fn start_scan(&self) -> impl Future<Output = Result<(), CurtainError>> + Send;

    /// End the current discovery pass. Safe to call when not scanning.
    fn stop_scan(&self) -> impl Future<Output = Result<(), CurtainError>> + Send;

    /// Issue a platform-level connect request and hold the peripheral on
    /// success.
    fn connect(&self, id: &CandidateId) -> impl Future<Output = Result<(), CurtainError>> + Send;

    /// Enumerate every advertised service and its characteristics on the
    /// held peripheral. No service filter — the remote device may not
    /// advertise service UUIDs at all.
    fn discover_services(
        &self,
    ) -> impl Future<Output = Result<Vec<ServiceReport>, CurtainError>> + Send;

    /// Put some lightweight traffic on the bus to wake a dozing module.
    /// Best-effort; errors are logged by the caller, never escalated.
    fn probe(
        &self,
        endpoint: &ResolvedEndpoint,
    ) -> impl Future<Output = Result<(), CurtainError>> + Send;

    /// Write one payload to the command endpoint with the given mode.
    fn write(
        &self,
        endpoint: &ResolvedEndpoint,
        kind: WriteKind,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), CurtainError>> + Send;

    /// Drop the platform connection and release the held peripheral.
    /// Safe to call when nothing is held.
    fn release(&self) -> impl Future<Output = Result<(), CurtainError>> + Send;
}
