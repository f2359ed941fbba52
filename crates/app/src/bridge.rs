//! External trigger bridge — forwards out-of-band trigger requests to the
//! dispatcher.
//!
//! Triggers arriving through this bridge fire the open sequence directly
//! and never touch the alarm scheduler: an armed alarm stays armed, an
//! idle scheduler stays idle.

use std::sync::Arc;

use crate::dispatcher::SignalDispatcher;
use crate::ports::{EventPublisher, Link};

/// Entry point for triggers originating outside the process, such as a
/// delivered remote notification or an operator signal.
pub struct ExternalTriggerBridge<L, P> {
    dispatcher: Arc<SignalDispatcher<L, P>>,
}

impl<L, P> ExternalTriggerBridge<L, P>
where
    L: Link + 'static,
    P: EventPublisher + 'static,
{
    #[must_use]
    pub fn new(dispatcher: Arc<SignalDispatcher<L, P>>) -> Self {
        Self { dispatcher }
    }

    /// Run the open sequence once for an external request.
    ///
    /// Follows the same skip rule as any other dispatch: when the
    /// connection is not ready the request is dropped with a status
    /// event.
    pub async fn trigger(&self) {
        tracing::info!("external trigger received");
        self.dispatcher.dispatch().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::future::Future;
    use std::sync::Mutex;

    use curtain_domain::candidate::CandidateId;
    use curtain_domain::endpoint::{
        CharacteristicReport, COMMAND_CHARACTERISTIC, EndpointCaps, ResolvedEndpoint,
        ServiceReport, WriteKind,
    };
    use curtain_domain::error::CurtainError;
    use curtain_domain::event::CoreEvent;

    use crate::dispatcher::DispatchConfig;
    use crate::session::{ConnectionSession, SessionConfig, SessionEvent};

    #[derive(Clone, Default)]
    struct FakeLink {
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl Link for FakeLink {
        async fn start_scan(&self) -> Result<(), CurtainError> {
            Ok(())
        }

        async fn stop_scan(&self) -> Result<(), CurtainError> {
            Ok(())
        }

        async fn connect(&self, _id: &CandidateId) -> Result<(), CurtainError> {
            Ok(())
        }

        async fn discover_services(&self) -> Result<Vec<ServiceReport>, CurtainError> {
            Ok(vec![ServiceReport {
                service: uuid::Uuid::from_u128(0xFFE0),
                characteristics: vec![CharacteristicReport {
                    uuid: COMMAND_CHARACTERISTIC,
                    caps: EndpointCaps {
                        write_without_response: true,
                        ..EndpointCaps::default()
                    },
                }],
            }])
        }

        async fn probe(&self, _endpoint: &ResolvedEndpoint) -> Result<(), CurtainError> {
            Ok(())
        }

        async fn write(
            &self,
            _endpoint: &ResolvedEndpoint,
            _kind: WriteKind,
            payload: &[u8],
        ) -> Result<(), CurtainError> {
            self.writes.lock().unwrap().push(payload.to_vec());
            Ok(())
        }

        async fn release(&self) -> Result<(), CurtainError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct SpyPublisher {
        events: Arc<Mutex<Vec<CoreEvent>>>,
    }

    impl EventPublisher for SpyPublisher {
        fn publish(&self, event: CoreEvent) -> impl Future<Output = Result<(), CurtainError>> + Send {
            self.events.lock().unwrap().push(event);
            async { Ok(()) }
        }
    }

    fn bridge_over(
        link: FakeLink,
        publisher: SpyPublisher,
    ) -> (ExternalTriggerBridge<FakeLink, SpyPublisher>, Arc<ConnectionSession<FakeLink, SpyPublisher>>) {
        let session = ConnectionSession::new(link, publisher.clone(), SessionConfig::default());
        let dispatcher =
            SignalDispatcher::new(Arc::clone(&session), publisher, DispatchConfig::default());
        (ExternalTriggerBridge::new(dispatcher), session)
    }

    #[tokio::test(start_paused = true)]
    async fn should_dispatch_when_session_is_ready() {
        let link = FakeLink::default();
        let publisher = SpyPublisher::default();
        let (bridge, session) = bridge_over(link.clone(), publisher.clone());

        session.start_scan().await;
        session
            .handle_event(SessionEvent::Discovered(
                curtain_domain::candidate::Candidate {
                    id: CandidateId::from("aa:bb"),
                    name: Some("HC-08".into()),
                    rssi: None,
                },
            ))
            .await;
        assert!(session.is_ready());

        bridge.trigger().await;

        let writes = link.writes.lock().unwrap();
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(|payload| payload == b"1"));
    }

    #[tokio::test]
    async fn should_skip_when_session_is_not_ready() {
        let link = FakeLink::default();
        let publisher = SpyPublisher::default();
        let (bridge, _session) = bridge_over(link.clone(), publisher.clone());

        bridge.trigger().await;

        assert!(link.writes.lock().unwrap().is_empty());
        let events = publisher.events.lock().unwrap();
        assert!(events.contains(&CoreEvent::DispatchSkipped));
    }
}
