// SPDX-License-Identifier: MIT
//! Observability utilities.
//!
//! RPC latency tracking and the health check payload.

use std::time::Instant;
use tracing::{debug, info};

/// Track latency of an async operation and emit a structured log event.
pub struct LatencyTracker {
    operation: String,
    start: Instant,
}

impl LatencyTracker {
    /// Start tracking latency for an operation.
    ///
    /// Examples:
    ///   let tracker = LatencyTracker::start("task.toggle");
    pub fn start(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
        }
    }

    /// Finish tracking and emit a log event with the elapsed time.
    pub fn finish(self) {
        let elapsed_ms = self.start.elapsed().as_millis();
        if elapsed_ms > 1000 {
            // Slow operation — log at info level
            info!(
                operation = %self.operation,
                elapsed_ms = elapsed_ms,
                "slow operation"
            );
        } else {
            debug!(
                operation = %self.operation,
                elapsed_ms = elapsed_ms,
                "operation complete"
            );
        }
    }
}

/// Health check status returned by `GET /health`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub active_connections: u64,
    pub port: u16,
}

impl HealthStatus {
    /// `storage_ok` is false once any snapshot save has failed; the board
    /// keeps serving either way.
    pub fn report(uptime_secs: u64, active_connections: u64, port: u16, storage_ok: bool) -> Self {
        Self {
            status: if storage_ok { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs,
            active_connections,
            port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_ok() {
        let h = HealthStatus::report(300, 2, 5001, true);
        assert_eq!(h.status, "ok");
        assert_eq!(h.active_connections, 2);
    }

    #[test]
    fn health_status_degraded_after_save_failure() {
        let h = HealthStatus::report(300, 0, 5001, false);
        assert_eq!(h.status, "degraded");
    }

    #[test]
    fn health_payload_is_camel_case() {
        let v = serde_json::to_value(HealthStatus::report(1, 0, 5001, true)).unwrap();
        assert!(v.get("uptimeSecs").is_some());
        assert!(v.get("activeConnections").is_some());
    }
}
