//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! catalog file (JSON)
//!     → loader.rs (parse, skip bad entries, validate URLs)
//!     → Catalog (validated, shared with the checker)
//!
//! schema.rs
//!     → probe behaviour (timeouts, redirects, TLS) and pool bounds
//! ```
//!
//! # Design Decisions
//! - Individually bad catalog entries are skipped with a warning; only a
//!   catalog with zero loadable servers is an error
//! - All schema fields have defaults so a minimal setup needs no file

pub mod loader;
pub mod schema;

pub use loader::{
    load_catalog, parse_catalog, save_catalog, validate_file, write_sample, ConfigError,
};
pub use schema::{
    CheckerConfig, DEFAULT_WORKERS, MAX_SERVERS_PER_CATEGORY, MAX_URL_LENGTH, MAX_WORKERS,
    MIN_WORKERS,
};
