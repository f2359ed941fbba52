//! Endpoint resolver — locates the command characteristic on a live
//! connection.
//!
//! The peripheral may report its services through separate asynchronous
//! discovery callbacks, in any order. The resolver therefore works as an
//! incremental accumulator: it is seeded with the number of discovered
//! services and consumes one [`ServiceReport`] at a time, declaring
//! "not found" only after *every* service has reported its
//! characteristics.

use std::collections::HashSet;

use uuid::Uuid;

use curtain_domain::endpoint::{COMMAND_CHARACTERISTIC, ResolvedEndpoint, ServiceReport};

/// Outcome of feeding one service report into the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveProgress {
    /// Not all services have reported and no match yet.
    Pending,
    /// First match, and the endpoint carries a write capability. The
    /// session may advance to ready.
    Found(ResolvedEndpoint),
    /// First match, but the endpoint supports no write mode. Soft failure:
    /// the session stays connected and never becomes ready.
    NotWritable(ResolvedEndpoint),
    /// All services reported; no characteristic matched.
    NotFound,
}

/// Incremental search for the well-known command characteristic.
///
/// One resolver instance lives for exactly one physical connection
/// establishment.
#[derive(Debug)]
pub struct EndpointResolver {
    expected: usize,
    reported: HashSet<Uuid>,
}

impl EndpointResolver {
    /// Start a resolution pass over `expected` discovered services.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            reported: HashSet::new(),
        }
    }

    /// Consume one service's characteristic report.
    ///
    /// Duplicate reports for the same service do not advance the
    /// completion count.
    pub fn ingest(&mut self, report: &ServiceReport) -> ResolveProgress {
        self.reported.insert(report.service);

        for characteristic in &report.characteristics {
            if characteristic.uuid == COMMAND_CHARACTERISTIC {
                let endpoint = ResolvedEndpoint {
                    service: report.service,
                    characteristic: characteristic.uuid,
                    caps: characteristic.caps,
                };
                return if characteristic.caps.is_writable() {
                    ResolveProgress::Found(endpoint)
                } else {
                    ResolveProgress::NotWritable(endpoint)
                };
            }
        }

        if self.is_exhausted() {
            ResolveProgress::NotFound
        } else {
            ResolveProgress::Pending
        }
    }

    /// Whether every expected service has reported.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.reported.len() >= self.expected
    }
}
