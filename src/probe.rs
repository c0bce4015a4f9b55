//! Prober - performs single bounded-timeout checks of endpoints
//!
//! A check is one GET request. Any HTTP response counts as the endpoint being
//! up, whatever its status code; only transport failures (connect, DNS, TLS,
//! timeout, body read) mark it down.
//!
//! Every check records exactly one observation in the [`MetricsStore`]. Callers
//! never touch the store themselves, so scheduler and API checks are counted
//! the same way.
//!
//! ```text
//! check(endpoint) → GET (timeout) → CheckOutcome → MetricsStore
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{error, instrument, trace, warn};

use crate::{Endpoint, MetricsStore};

/// Default per-probe timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a single check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The endpoint answered; the status code is passed through unchanged
    Up { status_code: u16, latency: Duration },

    /// No response within the timeout
    Down { reason: String },
}

impl CheckOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, CheckOutcome::Up { .. })
    }
}

/// Checks endpoints and records the outcomes
///
/// Cloning is cheap; clones share the HTTP connection pool and the store.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    metrics: Arc<MetricsStore>,
}

impl Prober {
    /// Create a prober whose requests are capped at `timeout`
    pub fn new(timeout: Duration, metrics: Arc<MetricsStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, metrics })
    }

    pub fn metrics(&self) -> &Arc<MetricsStore> {
        &self.metrics
    }

    /// Check a single endpoint and record the outcome
    #[instrument(skip_all, fields(url = %endpoint))]
    pub async fn check(&self, endpoint: &Endpoint) -> CheckOutcome {
        trace!("checking endpoint");

        let start = Instant::now();
        let result = self.execute_request(endpoint).await;
        let latency = start.elapsed();

        let outcome = match result {
            Ok(status_code) => CheckOutcome::Up {
                status_code,
                latency,
            },
            Err(e) => {
                warn!("endpoint is down: {:#}", e);
                CheckOutcome::Down {
                    reason: format!("{:#}", e),
                }
            }
        };

        self.record(endpoint, &outcome);
        outcome
    }

    /// Check every endpoint concurrently
    ///
    /// Results come back in the order of `endpoints`. A check task that aborts
    /// is reported and recorded as `Down`, so one bad target never takes the
    /// others with it. Checks are detached tasks: dropping this future (e.g. a
    /// disconnected client) leaves them running to completion and recording.
    pub async fn check_all(&self, endpoints: &[Endpoint]) -> Vec<(Endpoint, CheckOutcome)> {
        let handles: Vec<_> = endpoints
            .iter()
            .cloned()
            .map(|endpoint| {
                let prober = self.clone();
                tokio::spawn(async move { prober.check(&endpoint).await })
            })
            .collect();

        let mut results = Vec::with_capacity(endpoints.len());
        for (endpoint, handle) in endpoints.iter().cloned().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{endpoint}: check task aborted: {e}");
                    self.record_aborted(&endpoint)
                }
            };
            results.push((endpoint, outcome));
        }

        results
    }

    /// Issue the request and drain the body; returns the status code
    async fn execute_request(&self, endpoint: &Endpoint) -> Result<u16> {
        let mut response = self
            .client
            .get(endpoint.as_str())
            .send()
            .await
            .context("HTTP request failed")?;

        let status_code = response.status().as_u16();

        // Drain without buffering the whole body
        while response
            .chunk()
            .await
            .context("Failed to read response body")?
            .is_some()
        {}

        Ok(status_code)
    }

    fn record(&self, endpoint: &Endpoint, outcome: &CheckOutcome) {
        match outcome {
            CheckOutcome::Up { latency, .. } => {
                self.metrics.record_success(endpoint, latency.as_secs_f64())
            }
            CheckOutcome::Down { .. } => self.metrics.record_failure(endpoint),
        }
    }

    fn record_aborted(&self, endpoint: &Endpoint) -> CheckOutcome {
        let outcome = CheckOutcome::Down {
            reason: String::from("check aborted"),
        };
        self.record(endpoint, &outcome);
        outcome
    }
}
