//! btleplug-backed implementation of the application's link port.
//!
//! [`BleLink`] wraps one platform central adapter and holds at most one
//! connected peripheral at a time. Connect requests address peripherals by
//! the stringified platform identity that the event pump reported during
//! discovery.

use btleplug::api::{
    Central as _, CharPropFlags, Characteristic, Manager as _, Peripheral as _, ScanFilter,
    WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::sync::Mutex;

use curtain_app::ports::Link;
use curtain_domain::candidate::CandidateId;
use curtain_domain::endpoint::{
    CharacteristicReport, EndpointCaps, ResolvedEndpoint, ServiceReport, WriteKind,
};
use curtain_domain::error::CurtainError;

use crate::error::BleError;

/// Map btleplug characteristic property flags onto the domain capability
/// set.
pub(crate) fn caps_from_flags(flags: CharPropFlags) -> EndpointCaps {
    EndpointCaps {
        write_without_response: flags.contains(CharPropFlags::WRITE_WITHOUT_RESPONSE),
        write_with_response: flags.contains(CharPropFlags::WRITE),
        readable: flags.contains(CharPropFlags::READ),
        notifiable: flags.contains(CharPropFlags::NOTIFY),
    }
}

fn write_type(kind: WriteKind) -> WriteType {
    match kind {
        WriteKind::WithoutResponse => WriteType::WithoutResponse,
        WriteKind::WithResponse => WriteType::WithResponse,
    }
}

/// One central adapter plus the currently held peripheral, if any.
pub struct BleLink {
    central: Adapter,
    held: Mutex<Option<Peripheral>>,
}

impl BleLink {
    /// Open the first central adapter on the host.
    ///
    /// # Errors
    ///
    /// Returns [`BleError::NotAvailable`] when the host has no BLE
    /// adapter, or [`BleError::Ble`] when the manager cannot be reached.
    pub async fn open() -> Result<Self, BleError> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;
        let central = adapters.into_iter().next().ok_or(BleError::NotAvailable)?;
        Ok(Self {
            central,
            held: Mutex::new(None),
        })
    }

    /// The wrapped central, for wiring up the event pump.
    #[must_use]
    pub fn central(&self) -> &Adapter {
        &self.central
    }

    async fn held_peripheral(&self) -> Result<Peripheral, BleError> {
        self.held
            .lock()
            .await
            .clone()
            .ok_or(BleError::NoPeripheralHeld)
    }

    async fn find_peripheral(&self, id: &CandidateId) -> Result<Peripheral, BleError> {
        let peripherals = self.central.peripherals().await?;
        peripherals
            .into_iter()
            .find(|peripheral| peripheral.id().to_string() == id.as_str())
            .ok_or_else(|| BleError::PeripheralNotFound { id: id.clone() })
    }

    async fn find_characteristic(
        &self,
        endpoint: &ResolvedEndpoint,
    ) -> Result<(Peripheral, Characteristic), BleError> {
        let peripheral = self.held_peripheral().await?;
        let characteristic = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == endpoint.characteristic && c.service_uuid == endpoint.service)
            .ok_or(BleError::CharacteristicNotFound {
                uuid: endpoint.characteristic,
            })?;
        Ok((peripheral, characteristic))
    }
}

impl Link for BleLink {
    async fn start_scan(&self) -> Result<(), CurtainError> {
        // No service filter: the remote module does not reliably advertise
        // its service UUIDs.
        self.central
            .start_scan(ScanFilter::default())
            .await
            .map_err(|err| BleError::from(err).into_domain())
    }

    async fn stop_scan(&self) -> Result<(), CurtainError> {
        self.central
            .stop_scan()
            .await
            .map_err(|err| BleError::from(err).into_domain())
    }

    async fn connect(&self, id: &CandidateId) -> Result<(), CurtainError> {
        let peripheral = self
            .find_peripheral(id)
            .await
            .map_err(BleError::into_domain)?;
        peripheral
            .connect()
            .await
            .map_err(|err| CurtainError::ConnectFailed(err.to_string()))?;
        *self.held.lock().await = Some(peripheral);
        Ok(())
    }

    async fn discover_services(&self) -> Result<Vec<ServiceReport>, CurtainError> {
        let peripheral = self.held_peripheral().await.map_err(BleError::into_domain)?;
        peripheral
            .discover_services()
            .await
            .map_err(|err| BleError::from(err).into_domain())?;

        let reports = peripheral
            .services()
            .into_iter()
            .map(|service| ServiceReport {
                service: service.uuid,
                characteristics: service
                    .characteristics
                    .into_iter()
                    .map(|c| CharacteristicReport {
                        uuid: c.uuid,
                        caps: caps_from_flags(c.properties),
                    })
                    .collect(),
            })
            .collect();
        Ok(reports)
    }

    async fn probe(&self, endpoint: &ResolvedEndpoint) -> Result<(), CurtainError> {
        let (peripheral, characteristic) = self
            .find_characteristic(endpoint)
            .await
            .map_err(BleError::into_domain)?;
        if endpoint.caps.readable {
            peripheral
                .read(&characteristic)
                .await
                .map_err(|err| BleError::from(err).into_domain())?;
        }
        Ok(())
    }

    async fn write(
        &self,
        endpoint: &ResolvedEndpoint,
        kind: WriteKind,
        payload: &[u8],
    ) -> Result<(), CurtainError> {
        let (peripheral, characteristic) = self
            .find_characteristic(endpoint)
            .await
            .map_err(BleError::into_domain)?;
        peripheral
            .write(&characteristic, payload, write_type(kind))
            .await
            .map_err(|err| BleError::from(err).into_domain())
    }

    async fn release(&self) -> Result<(), CurtainError> {
        let Some(peripheral) = self.held.lock().await.take() else {
            return Ok(());
        };
        peripheral
            .disconnect()
            .await
            .map_err(|err| BleError::from(err).into_domain())
    }
}
