//! BLE adapter error types.

use curtain_domain::candidate::CandidateId;
use curtain_domain::error::CurtainError;

/// Errors specific to the BLE adapter.
#[derive(Debug, thiserror::Error)]
pub enum BleError {
    /// No BLE adapter found on the host.
    #[error("no BLE adapter available")]
    NotAvailable,

    /// Underlying BLE stack operation failed.
    #[error("BLE operation failed")]
    Ble(#[from] btleplug::Error),

    /// The central no longer knows a peripheral with this identity.
    #[error("peripheral {id} not known to the central")]
    PeripheralNotFound {
        /// The identity that was requested.
        id: CandidateId,
    },

    /// An operation that needs a live connection was called without one.
    #[error("no peripheral is currently held")]
    NoPeripheralHeld,

    /// The resolved characteristic is no longer present on the peripheral.
    #[error("characteristic {uuid} not found on held peripheral")]
    CharacteristicNotFound {
        /// The characteristic that was requested.
        uuid: uuid::Uuid,
    },
}

impl BleError {
    /// Convert into a [`CurtainError`] for propagation across the link
    /// port boundary.
    #[must_use]
    pub fn into_domain(self) -> CurtainError {
        match self {
            Self::NotAvailable => CurtainError::TransportUnavailable,
            Self::CharacteristicNotFound { .. } => CurtainError::EndpointNotFound,
            other => CurtainError::Transport(Box::new(other)),
        }
    }
}

impl From<BleError> for CurtainError {
    fn from(err: BleError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_available_error() {
        let err = BleError::NotAvailable;
        assert_eq!(err.to_string(), "no BLE adapter available");
    }

    #[test]
    fn should_display_peripheral_not_found_error() {
        let err = BleError::PeripheralNotFound {
            id: CandidateId::from("aa:bb:cc:dd:ee:ff"),
        };
        assert_eq!(
            err.to_string(),
            "peripheral aa:bb:cc:dd:ee:ff not known to the central"
        );
    }

    #[test]
    fn should_display_no_peripheral_held_error() {
        let err = BleError::NoPeripheralHeld;
        assert_eq!(err.to_string(), "no peripheral is currently held");
    }

    #[test]
    fn should_convert_not_available_to_transport_unavailable() {
        let err: CurtainError = BleError::NotAvailable.into();
        assert!(matches!(err, CurtainError::TransportUnavailable));
    }

    #[test]
    fn should_convert_missing_characteristic_to_endpoint_not_found() {
        let err: CurtainError = BleError::CharacteristicNotFound {
            uuid: uuid::Uuid::from_u128(0xFFE1),
        }
        .into();
        assert!(matches!(err, CurtainError::EndpointNotFound));
    }

    #[test]
    fn should_convert_stack_error_to_transport_error() {
        let err: CurtainError = BleError::Ble(btleplug::Error::DeviceNotFound).into();
        assert!(matches!(err, CurtainError::Transport(_)));
    }
}
