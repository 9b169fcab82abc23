// src/engine/tracker.rs

use std::collections::BTreeSet;

use tracing::debug;

use crate::compile::CompileRequest;

/// A request that was handed to the compile backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRequest {
    pub seq: u64,
    pub request: CompileRequest,
}

/// What a finished compile turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The response belongs to the latest issued request; apply it.
    Current(CompileRequest),
    /// Superseded (or already resolved); drop it.
    Stale,
}

/// Why a candidate request is not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redundancy {
    /// Equal to the snapshot of the last applied success.
    LastCompiled,
    /// Equal to the latest request, which is still in flight.
    InFlight,
}

/// Request identity bookkeeping.
///
/// Every issued request gets a monotonically increasing sequence number.
/// A response is current iff its number is the latest issued one and that
/// request has not been resolved yet. Older requests are never cancelled;
/// their responses are simply recognised as stale.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: Option<IssuedRequest>,
    latest_resolved: bool,
    /// Every issued request whose response has not arrived yet, stale or not.
    outstanding: BTreeSet<u64>,
    last_compiled: Option<CompileRequest>,
    /// Snapshot replaced by the latest `record_success`, restored if that
    /// success could not be shown.
    replaced_compiled: Option<CompileRequest>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new request as the authoritative one and return its number.
    pub fn issue(&mut self, request: CompileRequest) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;

        if let Some(previous) = self.latest_in_flight() {
            debug!(
                superseded = previous.seq,
                seq, "issuing request while previous one is in flight"
            );
        }

        self.outstanding.insert(seq);
        self.latest = Some(IssuedRequest { seq, request });
        self.latest_resolved = false;
        seq
    }

    /// Match a response to its request.
    pub fn resolve(&mut self, seq: u64) -> Resolution {
        self.outstanding.remove(&seq);

        match self.latest {
            Some(ref latest) if latest.seq == seq && !self.latest_resolved => {
                self.latest_resolved = true;
                Resolution::Current(latest.request.clone())
            }
            _ => Resolution::Stale,
        }
    }

    /// Remember the snapshot behind an applied success.
    pub fn record_success(&mut self, request: CompileRequest) {
        self.replaced_compiled = self.last_compiled.replace(request);
    }

    /// Undo the latest `record_success`. Returns the snapshot that was
    /// dropped.
    pub fn revert_success(&mut self) -> Option<CompileRequest> {
        let reverted = self.last_compiled.take();
        self.last_compiled = self.replaced_compiled.take();
        reverted
    }

    /// Give up on the latest request without issuing a new one. Its
    /// response will resolve as stale. Returns its number if one was in
    /// flight.
    pub fn supersede_in_flight(&mut self) -> Option<u64> {
        let seq = self.latest_in_flight()?.seq;
        self.latest_resolved = true;
        Some(seq)
    }

    /// Check whether sending `candidate` would be wasted work.
    pub fn redundancy(&self, candidate: &CompileRequest) -> Option<Redundancy> {
        if self.last_compiled.as_ref() == Some(candidate) {
            return Some(Redundancy::LastCompiled);
        }
        if self.latest_in_flight().map(|l| &l.request) == Some(candidate) {
            return Some(Redundancy::InFlight);
        }
        None
    }

    /// The latest issued request, while its response is still pending.
    pub fn latest_in_flight(&self) -> Option<&IssuedRequest> {
        if self.latest_resolved {
            None
        } else {
            self.latest.as_ref()
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.latest_in_flight().is_some()
    }

    pub fn last_compiled(&self) -> Option<&CompileRequest> {
        self.last_compiled.as_ref()
    }

    /// Number of requests (current or superseded) still awaiting a response.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Sequence number of the latest issued request, if any.
    pub fn latest_seq(&self) -> Option<u64> {
        self.latest.as_ref().map(|l| l.seq)
    }
}
