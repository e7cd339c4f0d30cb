//! Process-wide request metrics
//!
//! A table of named monotonic counters plus the process start time. Every
//! counter is an `AtomicU64` inside a `DashMap`, so increments from concurrent
//! requests never contend on a table-wide lock and never lose updates.
//! Readers copy each counter with a single atomic load.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counter incremented once per handled request
pub const REQUESTS_TOTAL: &str = "requests_total";

/// Prefix of the per-latency counters (`request_ms_<n>`)
pub const REQUEST_MS_PREFIX: &str = "request_ms_";

/// Shared handle to the counter table; clones point at the same table
#[derive(Clone, Debug)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    started_at: Instant,
    counters: DashMap<String, AtomicU64>,
}

/// Point-in-time view served by `GET /metrics`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    pub uptime_seconds: f64,
    pub counters: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    /// Value of a counter, zero when it was never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                started_at: Instant::now(),
                counters: DashMap::new(),
            }),
        }
    }

    /// Add 1 to the named counter
    pub fn inc(&self, name: &str) {
        self.increment(name, 1);
    }

    /// Add `amount` to the named counter, creating it at zero first
    pub fn increment(&self, name: &str, amount: u64) {
        if let Some(counter) = self.inner.counters.get(name) {
            counter.fetch_add(amount, Ordering::Relaxed);
            return;
        }

        self.inner
            .counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    /// Record one handled request's latency under `request_ms_<whole ms>`
    ///
    /// The counter name is unbounded in cardinality: one counter per distinct
    /// millisecond value ever observed.
    pub fn record_latency(&self, elapsed: Duration) {
        let name = format!("{}{}", REQUEST_MS_PREFIX, elapsed.as_millis());
        self.inc(&name);
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .inner
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect();

        MetricsSnapshot {
            uptime_seconds: self.uptime().as_secs_f64(),
            counters,
        }
    }
}
