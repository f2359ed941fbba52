//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the state machines
//! and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod clock;
pub mod collaborators;
pub mod event_bus;
pub mod link;

pub use clock::{Clock, SystemClock};
pub use collaborators::{AlertSink, NotificationGateway};
pub use event_bus::EventPublisher;
pub use link::Link;
