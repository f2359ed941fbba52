//! Common error taxonomy used across the workspace.
//!
//! None of these are fatal: every failure degrades the system to "not
//! ready" and is surfaced as an observable status event while discovery
//! keeps retrying. Each layer defines its own typed errors and converts
//! into [`CurtainError`] at the port boundary.

/// Failures of the connection and dispatch machinery.
#[derive(Debug, thiserror::Error)]
pub enum CurtainError {
    /// Radio is off, absent, or unauthorized. Scanning is not started and
    /// there is no automatic retry without user action.
    #[error("wireless transport unavailable")]
    TransportUnavailable,

    /// A platform-level connect request failed. Triggers an automatic
    /// re-scan.
    #[error("connection attempt failed: {0}")]
    ConnectFailed(String),

    /// The peripheral dropped the link without being asked. Triggers a
    /// delayed automatic re-scan.
    #[error("link lost unexpectedly")]
    UnsolicitedDisconnect,

    /// No characteristic matched the command endpoint identifier across
    /// all advertised services. The session stays connected but not ready.
    #[error("command endpoint not found")]
    EndpointNotFound,

    /// The command endpoint exists but supports no write mode. Terminal
    /// for the current connection.
    #[error("command endpoint is not writable")]
    EndpointNotWritable,

    /// One write attempt of a dispatch burst failed. Does not abort the
    /// remaining attempts.
    #[error("write attempt {attempt} failed: {reason}")]
    WriteFailed {
        /// 1-based attempt index within the burst.
        attempt: u8,
        /// Transport-reported reason.
        reason: String,
    },

    /// A dispatch was requested while the connection is not ready.
    #[error("connection is not ready")]
    NotReady,

    /// An alarm time could not be parsed or validated.
    #[error("invalid alarm time: {0}")]
    InvalidAlarmTime(String),

    /// Any other transport-layer failure, wrapped at the port boundary.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
