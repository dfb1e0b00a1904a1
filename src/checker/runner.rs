//! Check orchestration over the task pool.
//!
//! # Data Flow
//! ```text
//! Category
//!     → one task per server (probe → record → fold → report)
//!     → TaskPool (bounded workers)
//!     → wait_idle barrier
//!     → pool shutdown
//! ```
//!
//! # Design Decisions
//! - One pool per category run; the accumulator outlives the pools and is
//!   shared across categories
//! - A probe panic is caught at the task boundary and becomes an error
//!   outcome; the run never aborts for one server

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::catalog::{Catalog, Category};
use crate::checker::probe::{Outcome, Probe};
use crate::checker::stats::CheckStats;
use crate::config::{MAX_WORKERS, MIN_WORKERS};
use crate::pool::{PoolError, TaskPool};

/// Callback invoked once per completed check with the server, its outcome,
/// the 1-based position in the batch and the batch size.
///
/// Observational only. It runs on a pool worker, so it must not block
/// indefinitely; the pool does not protect against a stalled callback.
pub type ReportFn =
    Arc<dyn Fn(&crate::catalog::Server, &Outcome, usize, usize) + Send + Sync>;

/// Which categories a run covers.
#[derive(Debug, Clone, Copy)]
pub struct CheckSelection {
    pub ftp: bool,
    pub tv: bool,
    pub others: bool,
}

impl CheckSelection {
    pub fn all() -> Self {
        Self {
            ftp: true,
            tv: true,
            others: true,
        }
    }
}

/// Check every server in one category through a bounded worker pool.
///
/// An empty category short-circuits without creating a pool. The worker
/// count is clamped to the supported bounds before pool creation.
pub async fn check_category(
    category: &Category,
    probe: Arc<dyn Probe>,
    worker_count: usize,
    stats: &Arc<CheckStats>,
    report: &ReportFn,
) -> Result<(), PoolError> {
    if category.is_empty() {
        tracing::info!(category = category.name(), "No servers to check");
        return Ok(());
    }

    let worker_count = worker_count.clamp(MIN_WORKERS, MAX_WORKERS);
    let mut pool = TaskPool::new(worker_count)?;

    tracing::info!(
        category = category.name(),
        servers = category.len(),
        workers = worker_count,
        "Checking category"
    );

    let total = category.len();
    for (index, server) in category.servers().iter().enumerate() {
        let server = server.clone();
        let probe = probe.clone();
        let stats = stats.clone();
        let report = report.clone();

        let submitted = pool.submit(Box::pin(async move {
            let outcome = match AssertUnwindSafe(probe.probe(&server.url))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::error!(url = %server.url, "Probe panicked");
                    Outcome::error(0.0)
                }
            };

            server.record(outcome.status, outcome.latency_ms, outcome.response_code);
            stats.record(&outcome);
            report(&server, &outcome, index + 1, total);
        }));

        if let Err(e) = submitted {
            pool.shutdown().await;
            return Err(e);
        }
    }

    pool.wait_idle().await;
    pool.shutdown().await;

    tracing::info!(category = category.name(), "Category check complete");
    Ok(())
}

/// Check the selected categories in sequence against one shared
/// accumulator. A selection covering zero servers returns immediately.
pub async fn check_catalog(
    catalog: &Catalog,
    probe: Arc<dyn Probe>,
    worker_count: usize,
    selection: CheckSelection,
    stats: &Arc<CheckStats>,
    report: &ReportFn,
) -> Result<(), PoolError> {
    let selected = [
        (selection.ftp, &catalog.ftp),
        (selection.tv, &catalog.tv),
        (selection.others, &catalog.others),
    ];

    let planned: usize = selected
        .iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, category)| category.len())
        .sum();
    if planned == 0 {
        tracing::info!("No servers to check");
        return Ok(());
    }

    tracing::info!(servers = planned, workers = worker_count, "Starting checks");

    for (enabled, category) in selected {
        if enabled && !category.is_empty() {
            check_category(category, probe.clone(), worker_count, stats, report).await?;
        }
    }

    tracing::info!("All checks completed");
    Ok(())
}
