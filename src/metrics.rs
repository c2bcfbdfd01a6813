// SPDX-License-Identifier: MIT
//! Simple in-process counters for the board daemon.
//!
//! No external library — all counters are `AtomicU64` incremented inline.
//! Surfaced through `daemon.status` and the `/health` endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

/// In-process performance counters shared across all connections.
#[derive(Debug)]
pub struct BoardMetrics {
    /// Total WebSocket sessions accepted since daemon start.
    pub connections_total: AtomicU64,
    /// Currently open sessions.
    pub connections_open: AtomicU64,
    /// Total RPC requests dispatched since daemon start.
    pub rpc_requests_total: AtomicU64,
    /// Mutations that passed policy and were applied.
    pub ops_applied: AtomicU64,
    /// Mutations refused by policy.
    pub ops_denied: AtomicU64,
    /// Mutations addressed to ids outside the board range.
    pub ops_ignored: AtomicU64,
    /// Notifications handed to the broadcast channel.
    pub broadcasts_sent: AtomicU64,
    /// Snapshot saves that completed.
    pub snapshot_saves: AtomicU64,
    /// Snapshot saves that failed (logged, never fatal).
    pub snapshot_save_failures: AtomicU64,
    /// Daemon start time, used to calculate uptime.
    pub started_at: Instant,
}

/// Point-in-time counter values as exposed on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub connections_total: u64,
    pub connections_open: u64,
    pub rpc_requests_total: u64,
    pub ops_applied: u64,
    pub ops_denied: u64,
    pub ops_ignored: u64,
    pub broadcasts_sent: u64,
    pub snapshot_saves: u64,
    pub snapshot_save_failures: u64,
}

impl BoardMetrics {
    pub fn new() -> Self {
        Self {
            connections_total: AtomicU64::new(0),
            connections_open: AtomicU64::new(0),
            rpc_requests_total: AtomicU64::new(0),
            ops_applied: AtomicU64::new(0),
            ops_denied: AtomicU64::new(0),
            ops_ignored: AtomicU64::new(0),
            broadcasts_sent: AtomicU64::new(0),
            snapshot_saves: AtomicU64::new(0),
            snapshot_save_failures: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_open.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        let _ = self
            .connections_open
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v.saturating_sub(1)));
    }

    pub fn inc_rpc_requests(&self) {
        self.rpc_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ops_applied(&self) {
        self.ops_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ops_denied(&self) {
        self.ops_denied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ops_ignored(&self) {
        self.ops_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_broadcasts(&self) {
        self.broadcasts_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_snapshot_saves(&self) {
        self.snapshot_saves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_snapshot_save_failures(&self) {
        self.snapshot_save_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn open_connections(&self) -> u64 {
        self.connections_open.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Read every counter at once for a status payload.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.uptime_secs(),
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_open: self.connections_open.load(Ordering::Relaxed),
            rpc_requests_total: self.rpc_requests_total.load(Ordering::Relaxed),
            ops_applied: self.ops_applied.load(Ordering::Relaxed),
            ops_denied: self.ops_denied.load(Ordering::Relaxed),
            ops_ignored: self.ops_ignored.load(Ordering::Relaxed),
            broadcasts_sent: self.broadcasts_sent.load(Ordering::Relaxed),
            snapshot_saves: self.snapshot_saves.load(Ordering::Relaxed),
            snapshot_save_failures: self.snapshot_save_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for BoardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle — cheaply clonable.
pub type SharedMetrics = Arc<BoardMetrics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let m = BoardMetrics::new();
        let snap = m.snapshot();
        assert_eq!(snap.connections_total, 0);
        assert_eq!(snap.ops_applied, 0);
        assert_eq!(snap.snapshot_save_failures, 0);
    }

    #[test]
    fn connection_gauge_tracks_open_and_total() {
        let m = BoardMetrics::new();
        m.connection_opened();
        m.connection_opened();
        m.connection_closed();
        let snap = m.snapshot();
        assert_eq!(snap.connections_total, 2);
        assert_eq!(snap.connections_open, 1);
    }

    #[test]
    fn open_gauge_saturates_at_zero() {
        let m = BoardMetrics::new();
        m.connection_closed();
        assert_eq!(m.open_connections(), 0);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let m = BoardMetrics::new();
        m.inc_ops_denied();
        let v = serde_json::to_value(m.snapshot()).unwrap();
        assert_eq!(v["opsDenied"], 1);
        assert_eq!(v["snapshotSaves"], 0);
        assert!(v.get("uptimeSecs").is_some());
    }
}
