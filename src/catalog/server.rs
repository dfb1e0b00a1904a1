//! Server entries and status tracking.
//!
//! # Responsibilities
//! - Represent a single monitored server
//! - Hold the latest check result (status, latency, response code)
//! - Allow lock-free in-place updates from concurrent check workers

use std::sync::atomic::{AtomicI64, AtomicU16, AtomicU64, AtomicU8, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Check status of a server (0=Unknown, 1=Online, 2=Offline, 3=Timeout,
/// 4=Error).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown = 0,
    Online = 1,
    Offline = 2,
    Timeout = 3,
    Error = 4,
}

impl From<u8> for ServerStatus {
    fn from(val: u8) -> Self {
        match val {
            1 => ServerStatus::Online,
            2 => ServerStatus::Offline,
            3 => ServerStatus::Timeout,
            4 => ServerStatus::Error,
            _ => ServerStatus::Unknown,
        }
    }
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Unknown => "UNKNOWN",
            ServerStatus::Online => "ONLINE",
            ServerStatus::Offline => "OFFLINE",
            ServerStatus::Timeout => "TIMEOUT",
            ServerStatus::Error => "ERROR",
        }
    }
}

/// A single monitored server.
///
/// All mutable fields are atomics: check workers record results in place
/// while other parties read, with no lock on either side.
#[derive(Debug)]
pub struct Server {
    /// Target URL.
    pub url: String,
    /// Latest status (`ServerStatus` discriminant).
    status: AtomicU8,
    /// Latest latency in milliseconds (f64 bit pattern).
    latency_ms: AtomicU64,
    /// Latest HTTP response code (0 = no response seen).
    response_code: AtomicU16,
    /// Unix timestamp of the last check (0 = never checked).
    last_checked: AtomicI64,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: AtomicU8::new(ServerStatus::Unknown as u8),
            latency_ms: AtomicU64::new(0f64.to_bits()),
            response_code: AtomicU16::new(0),
            last_checked: AtomicI64::new(0),
        }
    }

    pub fn status(&self) -> ServerStatus {
        self.status.load(Ordering::Relaxed).into()
    }

    pub fn latency_ms(&self) -> f64 {
        f64::from_bits(self.latency_ms.load(Ordering::Relaxed))
    }

    /// HTTP response code of the last check, when a response arrived.
    pub fn response_code(&self) -> Option<u16> {
        match self.response_code.load(Ordering::Relaxed) {
            0 => None,
            code => Some(code),
        }
    }

    /// Unix timestamp of the last completed check.
    pub fn last_checked(&self) -> Option<i64> {
        match self.last_checked.load(Ordering::Relaxed) {
            0 => None,
            ts => Some(ts),
        }
    }

    /// Record one check result.
    pub fn record(&self, status: ServerStatus, latency_ms: f64, response_code: Option<u16>) {
        self.status.store(status as u8, Ordering::Relaxed);
        self.latency_ms.store(latency_ms.to_bits(), Ordering::Relaxed);
        self.response_code
            .store(response_code.unwrap_or(0), Ordering::Relaxed);
        self.last_checked.store(unix_now(), Ordering::Relaxed);
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
