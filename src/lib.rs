//! HTTP endpoint monitor library.
//!
//! # Architecture Overview
//!
//! ```text
//!   catalog JSON ──▶ config ──▶ catalog (servers by category)
//!                                   │
//!                                   ▼
//!                    checker::runner (one task per server)
//!                                   │
//!                                   ▼
//!                      pool::TaskPool (bounded workers)
//!                           │               │
//!                           ▼               ▼
//!                 checker::probe    checker::stats (lock-free folds)
//!                           │
//!                           ▼
//!                  report (per-check lines + summary)
//! ```

pub mod catalog;
pub mod checker;
pub mod config;
pub mod pool;
pub mod report;

pub use catalog::{Catalog, Category, CategoryKind, Server, ServerStatus};
pub use checker::{CheckStats, HttpProbe, Outcome, Probe, StatsSnapshot};
pub use config::CheckerConfig;
pub use pool::{PoolError, TaskPool};
pub use report::Reporter;
