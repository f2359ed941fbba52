//! Command protocol — the fixed payload meaning "activate actuator now".
//!
//! The actuator accepts a single ASCII character `'1'` on the command
//! endpoint. No response payload is interpreted; success is defined purely
//! by the local write call not erroring.

/// The one-byte "open the curtain" payload.
pub const OPEN_COMMAND: [u8; 1] = *b"1";

/// Number of redundant writes in one dispatch burst.
///
/// The link offers no application-level acknowledgment of physical
/// actuation, so the command is repeated to ride out dropped writes.
pub const BURST_ATTEMPTS: u8 = 3;
