//! Checking subsystem.
//!
//! # Data Flow
//! ```text
//! Category (catalog)
//!     → runner.rs (one task per server, submitted to the pool)
//!     → probe.rs (HEAD request, classify, measure latency)
//!     → stats.rs (lock-free fold of every outcome)
//!     → report callback (one line per completed check)
//! ```
//!
//! # Design Decisions
//! - The probe is an injected capability behind a trait; the runner and
//!   pool never touch the network themselves
//! - A failed check is an outcome, never an error: it is counted and
//!   reported, and the run continues

pub mod probe;
pub mod runner;
pub mod stats;

pub use probe::{HttpProbe, Outcome, Probe};
pub use runner::{check_catalog, check_category, CheckSelection, ReportFn};
pub use stats::{CheckStats, StatsSnapshot};
