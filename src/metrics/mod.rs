//! Request counters
//!
//! Tracks how lookups split between the store and the network.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by a fetcher and its callers
#[derive(Debug, Default)]
pub struct Metrics {
    lookups: AtomicU64,
    cache_hits: AtomicU64,
    network_requests: AtomicU64,
    store_writes: AtomicU64,
    errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_request(&self) {
        self.network_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_write(&self) {
        self.store_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn network_requests(&self) -> u64 {
        self.network_requests.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            network_requests: self.network_requests.load(Ordering::Relaxed),
            store_writes: self.store_writes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub lookups: u64,
    pub cache_hits: u64,
    pub network_requests: u64,
    pub store_writes: u64,
    pub errors: u64,
}

impl MetricsSnapshot {
    /// Share of lookups answered from the store, in percent
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / self.lookups as f64) * 100.0
        }
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lookups={} hits={} network={} writes={} errors={} hit_rate={:.1}%",
            self.lookups,
            self.cache_hits,
            self.network_requests,
            self.store_writes,
            self.errors,
            self.hit_rate()
        )
    }
}
