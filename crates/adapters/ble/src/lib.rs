//! # curtain-adapter-ble
//!
//! BLE adapter — the concrete transport behind the application's link
//! port, built on btleplug.
//!
//! ## How it works
//!
//! [`BleLink`] wraps one platform central adapter and implements the
//! outbound half of the port: scan control, connect, service discovery,
//! and characteristic writes. The inbound half is the [`pump`], which
//! forwards the central's discovery and disconnect events to the
//! connection session.
//!
//! ## Dependency rule
//!
//! Depends on `curtain-app` and `curtain-domain`; the application core
//! never imports btleplug types.

mod error;
mod link;
pub mod pump;

pub use error::BleError;
pub use link::BleLink;
