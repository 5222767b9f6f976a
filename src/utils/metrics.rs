//! Observability and Metrics
//!
//! This module provides counters for monitoring envelope traffic and decode health.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for codec operations
#[derive(Debug)]
pub struct Metrics {
    /// Envelopes successfully encoded
    pub envelopes_encoded: AtomicU64,
    /// Envelopes successfully decoded
    pub envelopes_decoded: AtomicU64,
    /// Total bytes produced by encoding
    pub bytes_encoded: AtomicU64,
    /// Total bytes consumed by successful decodes
    pub bytes_decoded: AtomicU64,
    /// Decodes rejected for an unregistered type tag
    pub unknown_types: AtomicU64,
    /// Decodes whose factory rejected the payload
    pub construction_failures: AtomicU64,
    /// Decodes rejected for malformed or oversized input
    pub decode_failures: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            envelopes_encoded: AtomicU64::new(0),
            envelopes_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            unknown_types: AtomicU64::new(0),
            construction_failures: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an encoded envelope
    pub fn envelope_encoded(&self, byte_count: u64) {
        self.envelopes_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a decoded envelope
    pub fn envelope_decoded(&self, byte_count: u64) {
        self.envelopes_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn unknown_type(&self) {
        self.unknown_types.fetch_add(1, Ordering::Relaxed);
    }

    pub fn construction_failed(&self) {
        self.construction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_failed(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            envelopes_encoded: self.envelopes_encoded.load(Ordering::Relaxed),
            envelopes_decoded: self.envelopes_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            unknown_types: self.unknown_types.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            envelopes_encoded = snapshot.envelopes_encoded,
            envelopes_decoded = snapshot.envelopes_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            unknown_types = snapshot.unknown_types,
            construction_failures = snapshot.construction_failures,
            decode_failures = snapshot.decode_failures,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
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
    pub envelopes_encoded: u64,
    pub envelopes_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub unknown_types: u64,
    pub construction_failures: u64,
    pub decode_failures: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Decodes that did not produce a value
    pub fn rejected_total(&self) -> u64 {
        self.unknown_types + self.construction_failures + self.decode_failures
    }
}

static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
