//! Observability and Metrics
//!
//! Process-wide counters aggregated over every connection.
//!
//! Per-connection traffic lives in [`NetworkStats`](crate::protocol::stats::NetworkStats);
//! this collector only sums totals so an application can log them periodically.
//! Uses atomic counters, so connections on different threads can share it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Global metrics collector for packet layer operations
#[derive(Debug)]
pub struct Metrics {
    /// Total connections created
    pub connections_total: AtomicU64,
    /// Connections not yet dropped
    pub connections_active: AtomicU64,
    /// Packets fully sent
    pub packets_sent: AtomicU64,
    /// Packets fully received
    pub packets_received: AtomicU64,
    /// Bytes of fully sent packets, headers included
    pub bytes_sent: AtomicU64,
    /// Bytes of fully received packets, headers included
    pub bytes_received: AtomicU64,
    /// Packets discarded by the authorization gate
    pub packets_dropped_unauthorized: AtomicU64,
    /// Connections that asked to be torn down
    pub disconnects_requested: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            connections_total: AtomicU64::new(0),
            connections_active: AtomicU64::new(0),
            packets_sent: AtomicU64::new(0),
            packets_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            packets_dropped_unauthorized: AtomicU64::new(0),
            disconnects_requested: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a new connection
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection dropped
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record a packet fully sent
    pub fn packet_sent(&self, byte_count: u64) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a packet fully received
    pub fn packet_received(&self, byte_count: u64) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a packet discarded by the authorization gate
    pub fn packet_dropped_unauthorized(&self) {
        self.packets_dropped_unauthorized
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record a disconnect request
    pub fn disconnect_requested(&self) {
        self.disconnects_requested.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            packets_received: self.packets_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            packets_dropped_unauthorized: self
                .packets_dropped_unauthorized
                .load(Ordering::Relaxed),
            disconnects_requested: self.disconnects_requested.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            connections_total = snapshot.connections_total,
            connections_active = snapshot.connections_active,
            packets_sent = snapshot.packets_sent,
            packets_received = snapshot.packets_received,
            bytes_sent = snapshot.bytes_sent,
            bytes_received = snapshot.bytes_received,
            packets_dropped_unauthorized = snapshot.packets_dropped_unauthorized,
            disconnects_requested = snapshot.disconnects_requested,
            uptime_seconds = snapshot.uptime_seconds,
            "Packet layer metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub connections_active: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub packets_dropped_unauthorized: u64,
    pub disconnects_requested: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_counters() {
        let metrics = Metrics::new();
        metrics.connection_opened();
        metrics.packet_sent(10);
        metrics.packet_sent(6);
        metrics.packet_received(4);
        metrics.packet_dropped_unauthorized();
        metrics.connection_closed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connections_total, 1);
        assert_eq!(snapshot.connections_active, 0);
        assert_eq!(snapshot.packets_sent, 2);
        assert_eq!(snapshot.bytes_sent, 16);
        assert_eq!(snapshot.packets_received, 1);
        assert_eq!(snapshot.bytes_received, 4);
        assert_eq!(snapshot.packets_dropped_unauthorized, 1);

        metrics.log_metrics();
    }
}
