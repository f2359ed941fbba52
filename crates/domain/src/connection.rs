//! Connection state — the lifecycle of the single peripheral session.
//!
//! Exactly one [`ConnectionState`] exists at any time, owned by the
//! connection session. It is the single source of truth for "can we send a
//! command right now": true only in [`ConnectionState::Ready`].

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;
use crate::endpoint::ResolvedEndpoint;

/// State machine of the peripheral connection.
///
/// Forward path: `Disconnected → Connecting → Connected → Resolving →
/// Ready`. Any disconnect or failure event takes the reverse edge
/// `* → Disconnected`, clearing all session-scoped handles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No peripheral held. The only state a connect may start from.
    #[default]
    Disconnected,
    /// A platform-level connect request is in flight.
    Connecting {
        /// The candidate being connected to.
        id: CandidateId,
    },
    /// Link established; the command endpoint is not (or could not be)
    /// resolved. Commands cannot be sent.
    Connected {
        /// The connected peripheral.
        id: CandidateId,
    },
    /// Link established; endpoint resolution in progress.
    Resolving {
        /// The connected peripheral.
        id: CandidateId,
    },
    /// Link established and command endpoint located. Commands may be sent.
    Ready {
        /// The connected peripheral.
        id: CandidateId,
        /// The resolved command endpoint.
        endpoint: ResolvedEndpoint,
    },
}

impl ConnectionState {
    /// True only in [`ConnectionState::Ready`].
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// The peripheral currently held, in any non-disconnected state.
    #[must_use]
    pub fn peripheral(&self) -> Option<&CandidateId> {
        match self {
            Self::Disconnected => None,
            Self::Connecting { id }
            | Self::Connected { id }
            | Self::Resolving { id }
            | Self::Ready { id, .. } => Some(id),
        }
    }

    /// The resolved endpoint, present only in [`ConnectionState::Ready`].
    #[must_use]
    pub fn endpoint(&self) -> Option<&ResolvedEndpoint> {
        match self {
            Self::Ready { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Short lowercase name for log fields and status lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting { .. } => "connecting",
            Self::Connected { .. } => "connected",
            Self::Resolving { .. } => "resolving",
            Self::Ready { .. } => "ready",
        }
    }
}
