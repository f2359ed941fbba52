//! # curtain-domain
//!
//! Pure domain model for the curtaind BLE curtain opener.
//!
//! ## Responsibilities
//! - Foundational types: error taxonomy, timestamps
//! - Define **Candidates** (discoverable remote peripherals)
//! - Define **ConnectionState** (the single source of truth for "can we
//!   send a command right now")
//! - Define **Endpoints** (the addressable command sink on the peripheral
//!   and its capability flags)
//! - Define **AlarmTime** (the wall-clock target of the scheduler)
//! - Define the **command protocol** constants (endpoint identifier and
//!   payload)
//! - Define **CoreEvents** (observable status records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod alarm;
pub mod candidate;
pub mod command;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod time;
