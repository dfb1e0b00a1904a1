//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Minimum number of pool workers.
pub const MIN_WORKERS: usize = 1;

/// Maximum number of pool workers.
pub const MAX_WORKERS: usize = 64;

/// Default number of pool workers.
pub const DEFAULT_WORKERS: usize = 15;

/// Upper bound on servers accepted per category.
pub const MAX_SERVERS_PER_CATEGORY: usize = 2000;

/// Upper bound on accepted URL length.
pub const MAX_URL_LENGTH: usize = 512;

/// Probe behaviour configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Whether redirects are followed.
    pub follow_redirects: bool,

    /// Redirect cap when following is enabled.
    pub max_redirects: usize,

    /// Whether TLS certificates are verified.
    pub verify_tls: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            follow_redirects: false,
            max_redirects: 0,
            verify_tls: true,
        }
    }
}
