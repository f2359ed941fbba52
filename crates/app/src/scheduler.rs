//! Alarm scheduler — fires the open command at a wall-clock target time.
//!
//! The scheduler holds at most one armed alarm and compares it against the
//! clock once per second. The trigger comparison works at minute
//! granularity and is guaranteed to fire at most once per arm cycle: the
//! alarm is disarmed in the same transition that decides to fire, so later
//! ticks within the target minute see an idle scheduler.
//!
//! Because discovery + connect + resolve can take seconds, the scheduler
//! pre-warms the link: the first tick inside the final 30 seconds starts a
//! scan when the connection is not ready, so the deadline is met with an
//! established session instead of starting discovery at trigger time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use curtain_domain::alarm::AlarmTime;
use curtain_domain::event::CoreEvent;

use crate::dispatcher::SignalDispatcher;
use crate::ports::{AlertSink, Clock, EventPublisher, Link, NotificationGateway};
use crate::session::ConnectionSession;

/// Period of the wall-clock comparison.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Seconds before the target at which the link is pre-warmed.
const PREWARM_WINDOW_SECS: i64 = 30;

/// How long the local alert presentation runs before being auto-stopped.
const ALERT_AUTO_STOP: Duration = Duration::from_secs(30);

struct ArmedAlarm {
    target: AlarmTime,
    /// One warm-up per arm cycle, latched on the first tick inside the
    /// window.
    prewarmed: bool,
}

#[derive(Default)]
struct SchedulerInner {
    armed: Option<ArmedAlarm>,
}

/// Holds the target time and triggers dispatch exactly once per armed
/// alarm.
pub struct AlarmScheduler<L, P, C, A, N> {
    session: Arc<ConnectionSession<L, P>>,
    dispatcher: Arc<SignalDispatcher<L, P>>,
    clock: C,
    alert: A,
    notifier: N,
    publisher: P,
    inner: Mutex<SchedulerInner>,
}

impl<L, P, C, A, N> AlarmScheduler<L, P, C, A, N>
where
    L: Link + 'static,
    P: EventPublisher + 'static,
    C: Clock + 'static,
    A: AlertSink + 'static,
    N: NotificationGateway + 'static,
{
    /// Create a scheduler. All collaborators are required up front — there
    /// is no nullable access path to the connection manager.
    #[must_use]
    pub fn new(
        session: Arc<ConnectionSession<L, P>>,
        dispatcher: Arc<SignalDispatcher<L, P>>,
        clock: C,
        alert: A,
        notifier: N,
        publisher: P,
    ) -> Arc<Self> {
        Arc::new(Self {
            session,
            dispatcher,
            clock,
            alert,
            notifier,
            publisher,
            inner: Mutex::new(SchedulerInner::default()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether an alarm is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.lock().armed.is_some()
    }

    /// The armed target, if any.
    #[must_use]
    pub fn target(&self) -> Option<AlarmTime> {
        self.lock().armed.as_ref().map(|alarm| alarm.target)
    }

    /// Arm the alarm for the given target, silently replacing any
    /// previously armed one. The target is also handed to the external
    /// notification facility.
    pub async fn arm(&self, target: AlarmTime) {
        {
            let mut inner = self.lock();
            inner.armed = Some(ArmedAlarm {
                target,
                prewarmed: false,
            });
        }
        self.notifier.clear();
        self.notifier.schedule(target);
        tracing::info!(%target, "alarm armed");
        self.publish(CoreEvent::AlarmArmed { target }).await;
    }

    /// Disarm. Idempotent — a cancel on an idle scheduler is a no-op.
    pub async fn cancel(&self) {
        let was_armed = self.lock().armed.take().is_some();
        if !was_armed {
            return;
        }
        self.notifier.clear();
        self.alert.stop();
        tracing::info!("alarm cancelled");
        self.publish(CoreEvent::AlarmCancelled).await;
    }

    /// Spawn the 1-second tick loop. Runs for the life of the process and
    /// no-ops while idle, so arming and re-arming never race a loop
    /// handle.
    pub fn spawn_ticker(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                scheduler.tick().await;
            }
        })
    }

    /// One wall-clock comparison.
    async fn tick(self: &Arc<Self>) {
        enum Step {
            Fire(AlarmTime),
            Prewarm(i64),
            Wait,
        }

        let now = self.clock.now();
        let step = {
            let mut inner = self.lock();
            let Some(alarm) = inner.armed.as_mut() else {
                return;
            };
            if alarm.target.matches(now) {
                let target = alarm.target;
                // Disarm before acting: at most one trigger per arm cycle,
                // no matter how many ticks land inside the target minute.
                inner.armed = None;
                Step::Fire(target)
            } else {
                let remaining = alarm.target.seconds_until(now);
                if remaining <= PREWARM_WINDOW_SECS && !alarm.prewarmed {
                    alarm.prewarmed = true;
                    Step::Prewarm(remaining)
                } else {
                    Step::Wait
                }
            }
        };

        match step {
            Step::Fire(target) => self.fire(target).await,
            Step::Prewarm(remaining_secs) => {
                if !self.session.is_ready() {
                    tracing::info!(remaining_secs, "pre-warming connection");
                    self.publish(CoreEvent::PrewarmStarted { remaining_secs })
                        .await;
                    self.session.start_scan().await;
                }
            }
            Step::Wait => {}
        }
    }

    async fn fire(self: &Arc<Self>, target: AlarmTime) {
        tracing::info!(%target, "alarm fired");
        self.publish(CoreEvent::AlarmFired { target }).await;

        self.alert.start();
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            // Ends the alert presentation only; never re-arms or
            // re-dispatches.
            tokio::time::sleep(ALERT_AUTO_STOP).await;
            scheduler.alert.stop();
        });

        self.dispatcher.dispatch().await;
    }

    async fn publish(&self, event: CoreEvent) {
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(%err, "failed to publish event");
        }
    }
}
