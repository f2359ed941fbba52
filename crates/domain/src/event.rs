//! Core events — observable status records for the excluded UI layer.
//!
//! Every state transition and failure of the core is published as a
//! [`CoreEvent`]. The [`std::fmt::Display`] impl renders the status line a
//! UI would show; the core never assumes a subscriber exists.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmTime;
use crate::candidate::{Candidate, CandidateId};
use crate::endpoint::ResolvedEndpoint;

/// A status record emitted by the connection, dispatch, or alarm machinery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreEvent {
    /// A discovery pass started.
    ScanStarted,
    /// A discovery pass ended without being superseded by a connection.
    ScanComplete {
        /// Number of distinct candidates seen during the pass.
        candidates: usize,
    },
    /// A new candidate appeared during the current pass.
    CandidateDiscovered {
        /// The discovered peripheral.
        candidate: Candidate,
    },
    /// A candidate matched the auto-connect tag and a connection was
    /// requested without user selection.
    AutoConnect {
        /// The matching peripheral.
        id: CandidateId,
    },
    /// A platform-level connect request was issued.
    Connecting {
        /// The target peripheral.
        id: CandidateId,
    },
    /// The link came up; endpoint resolution follows.
    Connected {
        /// The connected peripheral.
        id: CandidateId,
    },
    /// The connect request failed; discovery restarts.
    ConnectFailed {
        /// The target peripheral.
        id: CandidateId,
        /// Transport-reported reason.
        reason: String,
    },
    /// The command endpoint was located; commands may be sent.
    Ready {
        /// The resolved endpoint.
        endpoint: ResolvedEndpoint,
    },
    /// No characteristic matched the command identifier. Session stays
    /// connected but not ready.
    EndpointNotFound,
    /// The command characteristic exists but carries no write capability.
    EndpointNotWritable,
    /// The link dropped; a delayed re-scan is scheduled.
    Disconnected,
    /// A re-scan will start after the back-off delay.
    ReconnectScheduled {
        /// Back-off delay in seconds.
        delay_secs: u64,
    },
    /// The radio is off, absent, or unauthorized.
    TransportUnavailable,

    /// A dispatch was requested while not ready; nothing was written.
    DispatchSkipped,
    /// Wake phase started for a dispatch burst.
    DispatchStarted,
    /// One write of a burst was issued successfully.
    WriteIssued {
        /// 1-based attempt index.
        attempt: u8,
    },
    /// One write of a burst failed; remaining attempts still run.
    WriteFailed {
        /// 1-based attempt index.
        attempt: u8,
        /// Transport-reported reason.
        reason: String,
    },
    /// The session left `Ready` mid-burst; remaining writes were dropped.
    DispatchAborted,

    /// An alarm was armed (or re-armed, replacing the previous target).
    AlarmArmed {
        /// Wall-clock target.
        target: AlarmTime,
    },
    /// The warm-up window was entered while disconnected; a scan started.
    PrewarmStarted {
        /// Seconds remaining until the target.
        remaining_secs: i64,
    },
    /// The alarm fired; dispatch was invoked exactly once.
    AlarmFired {
        /// The target that fired.
        target: AlarmTime,
    },
    /// The alarm was cancelled before firing.
    AlarmCancelled,
}

impl fmt::Display for CoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScanStarted => write!(f, "scanning for peripherals"),
            Self::ScanComplete { candidates } => {
                write!(f, "scan complete, {candidates} candidate(s) found")
            }
            Self::CandidateDiscovered { candidate } => {
                write!(f, "discovered {}", candidate.label())
            }
            Self::AutoConnect { id } => write!(f, "auto-connecting to {id}"),
            Self::Connecting { id } => write!(f, "connecting to {id}"),
            Self::Connected { id } => write!(f, "connected to {id}"),
            Self::ConnectFailed { id, reason } => {
                write!(f, "connection to {id} failed: {reason}")
            }
            Self::Ready { endpoint } => {
                write!(f, "ready, command endpoint {}", endpoint.characteristic)
            }
            Self::EndpointNotFound => write!(f, "command endpoint not found"),
            Self::EndpointNotWritable => write!(f, "endpoint found but not writable"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::ReconnectScheduled { delay_secs } => {
                write!(f, "rescanning in {delay_secs}s")
            }
            Self::TransportUnavailable => write!(f, "wireless transport unavailable"),
            Self::DispatchSkipped => write!(f, "dispatch skipped: not ready"),
            Self::DispatchStarted => write!(f, "dispatching open command"),
            Self::WriteIssued { attempt } => write!(f, "write {attempt} issued"),
            Self::WriteFailed { attempt, reason } => {
                write!(f, "write {attempt} failed: {reason}")
            }
            Self::DispatchAborted => write!(f, "dispatch aborted: connection lost"),
            Self::AlarmArmed { target } => write!(f, "alarm armed for {target}"),
            Self::PrewarmStarted { remaining_secs } => {
                write!(f, "pre-connecting, {remaining_secs}s to alarm")
            }
            Self::AlarmFired { target } => write!(f, "alarm {target} fired"),
            Self::AlarmCancelled => write!(f, "alarm cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::endpoint::{COMMAND_CHARACTERISTIC, EndpointCaps};

    #[test]
    fn should_render_scan_status_lines() {
        assert_eq!(CoreEvent::ScanStarted.to_string(), "scanning for peripherals");
        assert_eq!(
            CoreEvent::ScanComplete { candidates: 2 }.to_string(),
            "scan complete, 2 candidate(s) found"
        );
    }

    #[test]
    fn should_render_discovery_with_candidate_label() {
        let event = CoreEvent::CandidateDiscovered {
            candidate: Candidate::new(
                CandidateId::from("AA:BB:CC:DD:EE:FF"),
                Some("HC-08".to_owned()),
                None,
            ),
        };
        assert_eq!(event.to_string(), "discovered HC-08 (AA:BB:CC:DD:EE:FF)");
    }

    #[test]
    fn should_render_ready_with_endpoint() {
        let event = CoreEvent::Ready {
            endpoint: ResolvedEndpoint {
                service: uuid::Uuid::from_u128(0xFFE0),
                characteristic: COMMAND_CHARACTERISTIC,
                caps: EndpointCaps::default(),
            },
        };
        assert_eq!(
            event.to_string(),
            "ready, command endpoint 0000ffe1-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn should_render_alarm_status_lines() {
        let target = AlarmTime::new(7, 30).unwrap();
        assert_eq!(
            CoreEvent::AlarmArmed { target }.to_string(),
            "alarm armed for 07:30"
        );
        assert_eq!(
            CoreEvent::AlarmFired { target }.to_string(),
            "alarm 07:30 fired"
        );
        assert_eq!(
            CoreEvent::PrewarmStarted { remaining_secs: 30 }.to_string(),
            "pre-connecting, 30s to alarm"
        );
    }

    #[test]
    fn should_roundtrip_event_through_serde_json() {
        let event = CoreEvent::WriteFailed {
            attempt: 2,
            reason: "gatt busy".to_owned(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
