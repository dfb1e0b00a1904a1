//! Aggregate check statistics.
//!
//! # Responsibilities
//! - Count outcomes per classification
//! - Track running sum / min / max latency over online checks
//! - Stay lock-free under concurrent folds from every worker
//!
//! # Design Decisions
//! - Latency aggregates are f64 bit patterns in `AtomicU64`, updated with
//!   optimistic compare-and-swap retry loops; the folds are commutative
//!   (sum, min, max, count) so the final values are order-independent
//! - `total` and the per-classification counter are two separate atomic
//!   increments; the accumulator is only read once the pool is idle, so no
//!   reader can observe the gap between them

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::catalog::ServerStatus;
use crate::checker::probe::Outcome;

/// Lock-free statistics accumulator shared by every check worker.
#[derive(Debug)]
pub struct CheckStats {
    total: AtomicUsize,
    online: AtomicUsize,
    offline: AtomicUsize,
    timeout: AtomicUsize,
    error: AtomicUsize,
    /// f64 bits; sum of online latencies.
    sum_latency_ms: AtomicU64,
    /// f64 bits; +inf until the first online check.
    min_latency_ms: AtomicU64,
    /// f64 bits; 0.0 until the first online check.
    max_latency_ms: AtomicU64,
}

impl CheckStats {
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            online: AtomicUsize::new(0),
            offline: AtomicUsize::new(0),
            timeout: AtomicUsize::new(0),
            error: AtomicUsize::new(0),
            sum_latency_ms: AtomicU64::new(0f64.to_bits()),
            min_latency_ms: AtomicU64::new(f64::INFINITY.to_bits()),
            max_latency_ms: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// Fold one outcome into the totals. Latency aggregates move only for
    /// online outcomes with a non-negative latency.
    pub fn record(&self, outcome: &Outcome) {
        self.total.fetch_add(1, Ordering::AcqRel);

        match outcome.status {
            ServerStatus::Online => self.online.fetch_add(1, Ordering::AcqRel),
            ServerStatus::Offline => self.offline.fetch_add(1, Ordering::AcqRel),
            ServerStatus::Timeout => self.timeout.fetch_add(1, Ordering::AcqRel),
            ServerStatus::Error | ServerStatus::Unknown => {
                self.error.fetch_add(1, Ordering::AcqRel)
            }
        };

        if outcome.status == ServerStatus::Online && outcome.latency_ms >= 0.0 {
            self.add_latency(outcome.latency_ms);
            self.lower_min(outcome.latency_ms);
            self.raise_max(outcome.latency_ms);
        }
    }

    /// Add to the running sum: read, compute, attempt the swap, retry on
    /// contention. Never blocks, never loses an update.
    fn add_latency(&self, latency_ms: f64) {
        let mut current = self.sum_latency_ms.load(Ordering::Acquire);
        loop {
            let next = (f64::from_bits(current) + latency_ms).to_bits();
            match self.sum_latency_ms.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Lower the running minimum. The loop stops once the current value is
    /// no longer larger than the candidate.
    fn lower_min(&self, latency_ms: f64) {
        let mut current = self.min_latency_ms.load(Ordering::Acquire);
        while latency_ms < f64::from_bits(current) {
            match self.min_latency_ms.compare_exchange_weak(
                current,
                latency_ms.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Raise the running maximum, symmetric to [`Self::lower_min`].
    fn raise_max(&self, latency_ms: f64) {
        let mut current = self.max_latency_ms.load(Ordering::Acquire);
        while latency_ms > f64::from_bits(current) {
            match self.max_latency_ms.compare_exchange_weak(
                current,
                latency_ms.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Point-in-time copy of all fields.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.total.load(Ordering::Acquire),
            online: self.online.load(Ordering::Acquire),
            offline: self.offline.load(Ordering::Acquire),
            timeout: self.timeout.load(Ordering::Acquire),
            error: self.error.load(Ordering::Acquire),
            sum_latency_ms: f64::from_bits(self.sum_latency_ms.load(Ordering::Acquire)),
            min_latency_ms: f64::from_bits(self.min_latency_ms.load(Ordering::Acquire)),
            max_latency_ms: f64::from_bits(self.max_latency_ms.load(Ordering::Acquire)),
        }
    }
}

impl Default for CheckStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Copied-out view of the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub timeout: usize,
    pub error: usize,
    pub sum_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
}

impl StatsSnapshot {
    /// Mean online latency, computed on demand; 0 when nothing was online.
    pub fn average_latency_ms(&self) -> f64 {
        if self.online == 0 {
            0.0
        } else {
            self.sum_latency_ms / self.online as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: ServerStatus, latency_ms: f64) -> Outcome {
        Outcome {
            status,
            latency_ms,
            response_code: None,
        }
    }

    #[test]
    fn fresh_accumulator_holds_sentinels() {
        let snapshot = CheckStats::new().snapshot();
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.min_latency_ms, f64::INFINITY);
        assert_eq!(snapshot.max_latency_ms, 0.0);
        assert_eq!(snapshot.average_latency_ms(), 0.0);
    }

    #[test]
    fn categories_conserve_total() {
        let stats = CheckStats::new();
        stats.record(&outcome(ServerStatus::Online, 10.0));
        stats.record(&outcome(ServerStatus::Online, 30.0));
        stats.record(&outcome(ServerStatus::Offline, 5.0));
        stats.record(&outcome(ServerStatus::Timeout, 0.0));
        stats.record(&outcome(ServerStatus::Error, 0.0));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 5);
        assert_eq!(
            snapshot.total,
            snapshot.online + snapshot.offline + snapshot.timeout + snapshot.error
        );
    }

    #[test]
    fn latency_aggregates_cover_online_only() {
        let stats = CheckStats::new();
        stats.record(&outcome(ServerStatus::Online, 20.0));
        stats.record(&outcome(ServerStatus::Online, 40.0));
        // Non-online latencies must not move the aggregates.
        stats.record(&outcome(ServerStatus::Offline, 500.0));
        stats.record(&outcome(ServerStatus::Timeout, 10000.0));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.sum_latency_ms, 60.0);
        assert_eq!(snapshot.min_latency_ms, 20.0);
        assert_eq!(snapshot.max_latency_ms, 40.0);
        assert_eq!(snapshot.average_latency_ms(), 30.0);
    }

    #[test]
    fn min_never_rises_and_max_never_drops() {
        let stats = CheckStats::new();
        for latency in [50.0, 5.0, 100.0, 25.0] {
            stats.record(&outcome(ServerStatus::Online, latency));
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.min_latency_ms, 5.0);
        assert_eq!(snapshot.max_latency_ms, 100.0);
    }
}
