//! Server catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Catalog JSON (config::loader)
//!     → category.rs (grouping, capacity and URL validation)
//!     → server.rs (per-server state, updated in place by check workers)
//! ```
//!
//! # Design Decisions
//! - Server state lives in atomics so concurrent workers record results
//!   without a lock
//! - Categories are fixed (ftp / tv / others); the catalog format names
//!   them by key

pub mod category;
pub mod server;

pub use category::{Catalog, Category, CategoryKind};
pub use server::{Server, ServerStatus};
