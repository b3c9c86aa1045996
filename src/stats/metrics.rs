//! Relay counters
//!
//! Lock-free counters updated on every routing decision and connection
//! lifecycle event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::router::RouteOutcome;

/// Server-wide relay counters
#[derive(Debug)]
pub struct RelayStats {
    started_at: Instant,
    connections_accepted: AtomicU64,
    connections_rejected: AtomicU64,
    active_connections: AtomicU64,
    forwarded: AtomicU64,
    dropped_malformed: AtomicU64,
    dropped_unknown_type: AtomicU64,
    dropped_unknown_target: AtomicU64,
    dropped_delivery_failed: AtomicU64,
}

impl RelayStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            connections_accepted: AtomicU64::new(0),
            connections_rejected: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            forwarded: AtomicU64::new(0),
            dropped_malformed: AtomicU64::new(0),
            dropped_unknown_type: AtomicU64::new(0),
            dropped_unknown_target: AtomicU64::new(0),
            dropped_delivery_failed: AtomicU64::new(0),
        }
    }

    /// Record an established (registered) connection
    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the teardown of an established connection
    pub fn connection_closed(&self) {
        // Saturate rather than wrap if a close is ever recorded twice
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Record a socket refused by the connection limit
    pub fn connection_rejected(&self) {
        self.connections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the result of routing one frame
    pub fn record(&self, outcome: &RouteOutcome) {
        let counter = match outcome {
            RouteOutcome::Forwarded { .. } => &self.forwarded,
            RouteOutcome::Malformed => &self.dropped_malformed,
            RouteOutcome::UnknownType { .. } => &self.dropped_unknown_type,
            RouteOutcome::TargetNotFound { .. } | RouteOutcome::MissingTarget { .. } => {
                &self.dropped_unknown_target
            }
            RouteOutcome::DeliveryFailed { .. } => &self.dropped_delivery_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime: self.started_at.elapsed(),
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            dropped_malformed: self.dropped_malformed.load(Ordering::Relaxed),
            dropped_unknown_type: self.dropped_unknown_type.load(Ordering::Relaxed),
            dropped_unknown_target: self.dropped_unknown_target.load(Ordering::Relaxed),
            dropped_delivery_failed: self.dropped_delivery_failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`RelayStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Time since the counters were created
    pub uptime: Duration,
    /// Connections that completed the handshake and were registered
    pub connections_accepted: u64,
    /// Sockets refused by the connection limit
    pub connections_rejected: u64,
    /// Currently registered connections
    pub active_connections: u64,
    /// Frames delivered to a target queue
    pub forwarded: u64,
    /// Frames that were not valid envelopes
    pub dropped_malformed: u64,
    /// Frames with an unrecognized `type`
    pub dropped_unknown_type: u64,
    /// Frames addressed to an identity nobody holds, or to no identity
    pub dropped_unknown_target: u64,
    /// Frames whose target queue was full or closed
    pub dropped_delivery_failed: u64,
}

impl StatsSnapshot {
    /// Total frames dropped for any reason
    pub fn dropped(&self) -> u64 {
        self.dropped_malformed
            + self.dropped_unknown_type
            + self.dropped_unknown_target
            + self.dropped_delivery_failed
    }
}
