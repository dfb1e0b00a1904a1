//! HTTP probe capability.
//!
//! # Responsibilities
//! - Perform one HEAD request against a server URL
//! - Classify the result as online / offline / timeout / error
//! - Measure round-trip latency

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::redirect;

use crate::catalog::ServerStatus;
use crate::config::CheckerConfig;

/// Result of probing a single server. Exactly one classification per
/// check; no server is double-counted.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: ServerStatus,
    /// Round-trip latency in milliseconds.
    pub latency_ms: f64,
    /// HTTP response code, when a response arrived.
    pub response_code: Option<u16>,
}

impl Outcome {
    /// Outcome for a check that failed outside the HTTP exchange itself.
    pub fn error(latency_ms: f64) -> Self {
        Self {
            status: ServerStatus::Error,
            latency_ms,
            response_code: None,
        }
    }
}

/// A capability that checks one URL at a time.
///
/// Implementations must be safe to invoke concurrently from many workers;
/// per-call state may not be shared mutably across calls.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> Outcome;
}

/// Probe backed by a shared `reqwest` client.
///
/// The client enforces the request timeout, connect timeout, redirect
/// policy and TLS verification taken from [`CheckerConfig`]; response
/// bodies are discarded.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(config: &CheckerConfig) -> Result<Self, reqwest::Error> {
        let redirect_policy = if config.follow_redirects {
            redirect::Policy::limited(config.max_redirects)
        } else {
            redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(redirect_policy)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &str) -> Outcome {
        let start = Instant::now();
        let result = self.client.head(url).send().await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                let code = response.status().as_u16();
                // 2xx and 3xx count as reachable; anything else answered
                // but is not serving.
                let status = if (200..400).contains(&code) {
                    ServerStatus::Online
                } else {
                    ServerStatus::Offline
                };
                Outcome {
                    status,
                    latency_ms,
                    response_code: Some(code),
                }
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!(url, error = %e, "Probe timed out");
                Outcome {
                    status: ServerStatus::Timeout,
                    latency_ms,
                    response_code: None,
                }
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "Probe failed");
                Outcome {
                    status: ServerStatus::Error,
                    latency_ms,
                    response_code: None,
                }
            }
        }
    }
}
