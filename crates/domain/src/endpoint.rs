//! Endpoint — the addressable command sink on the peripheral.
//!
//! The remote actuator exposes a single writable GATT characteristic
//! identified by the 16-bit value `0xFFE1`. The peripheral may not
//! advertise service UUIDs at all, so resolution enumerates every service
//! and searches their characteristics for this identifier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 16-bit identifier of the command characteristic.
pub const COMMAND_CHARACTERISTIC_SHORT_ID: u16 = 0xFFE1;

/// The command characteristic, expanded onto the Bluetooth base UUID.
pub const COMMAND_CHARACTERISTIC: Uuid = Uuid::from_u128(0x0000_FFE1_0000_1000_8000_0080_5F9B_34FB);

/// Capability flags of a characteristic, as advertised by the peripheral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCaps {
    /// Supports fire-and-forget writes with no delivery acknowledgment.
    pub write_without_response: bool,
    /// Supports acknowledged writes.
    pub write_with_response: bool,
    /// Supports reads.
    pub readable: bool,
    /// Supports notifications.
    pub notifiable: bool,
}

/// How a single write should be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteKind {
    /// Fire-and-forget, no response wait. Preferred for lower latency.
    WithoutResponse,
    /// Acknowledged write.
    WithResponse,
}

impl EndpointCaps {
    /// Pick the write mode for dispatch: without-response when supported,
    /// with-response as fallback, `None` when the endpoint is not writable
    /// at all.
    #[must_use]
    pub fn preferred_write(self) -> Option<WriteKind> {
        if self.write_without_response {
            Some(WriteKind::WithoutResponse)
        } else if self.write_with_response {
            Some(WriteKind::WithResponse)
        } else {
            None
        }
    }

    /// Whether any write mode is available.
    #[must_use]
    pub fn is_writable(self) -> bool {
        self.preferred_write().is_some()
    }
}

/// The command endpoint once located on a live connection.
///
/// Owned by the connection session; invalidated (dropped) the instant a
/// disconnect occurs. Other components must never cache it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    /// Service grouping the characteristic was found under.
    pub service: Uuid,
    /// The characteristic itself.
    pub characteristic: Uuid,
    /// Advertised capability flags.
    pub caps: EndpointCaps,
}

/// One characteristic listed in a service report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicReport {
    /// Characteristic UUID.
    pub uuid: Uuid,
    /// Advertised capability flags.
    pub caps: EndpointCaps,
}

/// The characteristics of one advertised service, as reported by a single
/// discovery callback. Reports for distinct services may arrive in any
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReport {
    /// Service UUID.
    pub service: Uuid,
    /// All characteristics under this service.
    pub characteristics: Vec<CharacteristicReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expand_short_id_onto_bluetooth_base_uuid() {
        assert_eq!(
            COMMAND_CHARACTERISTIC.to_string(),
            "0000ffe1-0000-1000-8000-00805f9b34fb"
        );
        let short = u16::try_from((COMMAND_CHARACTERISTIC.as_u128() >> 96) & 0xFFFF).unwrap();
        assert_eq!(short, COMMAND_CHARACTERISTIC_SHORT_ID);
    }

    #[test]
    fn should_prefer_write_without_response_when_both_supported() {
        let caps = EndpointCaps {
            write_without_response: true,
            write_with_response: true,
            ..EndpointCaps::default()
        };
        assert_eq!(caps.preferred_write(), Some(WriteKind::WithoutResponse));
    }

    #[test]
    fn should_fall_back_to_write_with_response() {
        let caps = EndpointCaps {
            write_with_response: true,
            ..EndpointCaps::default()
        };
        assert_eq!(caps.preferred_write(), Some(WriteKind::WithResponse));
    }

    #[test]
    fn should_report_not_writable_when_neither_write_mode_supported() {
        let caps = EndpointCaps {
            readable: true,
            notifiable: true,
            ..EndpointCaps::default()
        };
        assert_eq!(caps.preferred_write(), None);
        assert!(!caps.is_writable());
    }
}
