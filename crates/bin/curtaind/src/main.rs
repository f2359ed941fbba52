//! # curtaind — curtain opener daemon
//!
//! Composition root that wires the BLE adapter to the application core and
//! runs it.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Open the BLE central and construct the link
//! - Construct the session, dispatcher, scheduler, and trigger bridge,
//!   injecting collaborators via port traits
//! - Start the adapter event pump and the scheduler tick loop
//! - Arm the configured alarm and kick off the first discovery pass
//! - Translate `SIGUSR1` into external trigger requests
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use curtain_adapter_ble::{BleLink, pump};
use curtain_app::bridge::ExternalTriggerBridge;
use curtain_app::dispatcher::SignalDispatcher;
use curtain_app::event_bus::InProcessEventBus;
use curtain_app::ports::{AlertSink, Link as _, NotificationGateway, SystemClock};
use curtain_app::scheduler::AlarmScheduler;
use curtain_app::session::ConnectionSession;

use crate::config::Config;

/// Alert presentation for a headless process: log lines stand in for the
/// sound/visual surface.
struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn start(&self) {
        tracing::info!("wake-up alert started");
    }

    fn stop(&self) {
        tracing::info!("wake-up alert stopped");
    }
}

/// Notification delivery is out of scope for the daemon; the pending
/// request is only logged so an operator can see what is scheduled.
struct LogNotificationGateway;

impl NotificationGateway for LogNotificationGateway {
    fn schedule(&self, target: curtain_domain::alarm::AlarmTime) {
        tracing::info!(%target, "notification scheduled");
    }

    fn clear(&self) {
        tracing::debug!("pending notification cleared");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let link = BleLink::open().await?;
    let central = link.central().clone();

    let bus = InProcessEventBus::new(256);
    let session = ConnectionSession::new(link, bus.clone(), config.session_config());
    let dispatcher = SignalDispatcher::new(
        Arc::clone(&session),
        bus.clone(),
        config.dispatch_config(),
    );
    let scheduler = AlarmScheduler::new(
        Arc::clone(&session),
        Arc::clone(&dispatcher),
        SystemClock,
        TracingAlertSink,
        LogNotificationGateway,
        bus.clone(),
    );
    let bridge = ExternalTriggerBridge::new(dispatcher);

    pump::spawn(central, Arc::clone(&session));
    scheduler.spawn_ticker();

    // Surface every core event as a status line.
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(%event, "status"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "status subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    if let Some(target) = config.alarm_time()? {
        scheduler.arm(target).await;
    }
    session.start_scan().await;

    let mut trigger_signal = signal(SignalKind::user_defined1())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = trigger_signal.recv() => {
                if received.is_none() {
                    break;
                }
                bridge.trigger().await;
            }
        }
    }

    tracing::info!("shutting down");
    scheduler.cancel().await;
    if let Err(err) = session.link().release().await {
        tracing::debug!(%err, "failed to release peripheral on shutdown");
    }
    Ok(())
}
