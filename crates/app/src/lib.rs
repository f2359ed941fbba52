//! # curtain-app
//!
//! Application layer — the connection, dispatch, and alarm state machines,
//! plus **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound
//!   ports):
//!   - `Link` — scan, connect, enumerate, probe, and write on the wireless
//!     transport
//!   - `Clock` — wall-clock time source
//!   - `AlertSink` / `NotificationGateway` — out-of-scope presentation
//!     collaborators
//!   - `EventPublisher` — status event sink
//! - Own the **ConnectionSession** state machine (`Disconnected →
//!   Connecting → Connected → Resolving → Ready`, with the reverse edge on
//!   any disconnect)
//! - Own the **EndpointResolver**, **SignalDispatcher**, **AlarmScheduler**
//!   and **ExternalTriggerBridge**
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `curtain-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and timers). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod bridge;
pub mod dispatcher;
pub mod event_bus;
pub mod ports;
pub mod resolver;
pub mod scheduler;
pub mod session;
