//! Event pump — translates central adapter events into session events.
//!
//! btleplug surfaces discovery and disconnect notifications as a stream of
//! [`CentralEvent`]s. The pump narrows that stream to the two callbacks the
//! session understands and drops everything else, so the application core
//! never sees a platform type.

use std::sync::Arc;

use btleplug::api::{Central as _, CentralEvent, Peripheral as _};
use btleplug::platform::Adapter;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt as _;

use curtain_app::ports::EventPublisher;
use curtain_app::session::{ConnectionSession, SessionEvent};
use curtain_domain::candidate::{Candidate, CandidateId};

use crate::link::BleLink;

/// Spawn the pump task. It runs until the central's event stream ends.
pub fn spawn<P>(central: Adapter, session: Arc<ConnectionSession<BleLink, P>>) -> JoinHandle<()>
where
    P: EventPublisher + 'static,
{
    tokio::spawn(async move {
        let mut events = match central.events().await {
            Ok(events) => events,
            Err(err) => {
                tracing::error!(%err, "failed to open central event stream");
                return;
            }
        };

        while let Some(event) = events.next().await {
            match event {
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => {
                    let Ok(peripheral) = central.peripheral(&id).await else {
                        continue;
                    };
                    let Ok(Some(props)) = peripheral.properties().await else {
                        continue;
                    };
                    let candidate = Candidate::new(
                        CandidateId::new(id.to_string()),
                        props.local_name,
                        props.rssi,
                    );
                    session
                        .handle_event(SessionEvent::Discovered(candidate))
                        .await;
                }
                CentralEvent::DeviceDisconnected(id) => {
                    session
                        .handle_event(SessionEvent::LinkLost(CandidateId::new(id.to_string())))
                        .await;
                }
                _ => {}
            }
        }
        tracing::debug!("central event stream ended");
    })
}
