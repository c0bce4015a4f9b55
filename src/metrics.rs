//! Metrics store for probe outcomes
//!
//! Every endpoint gets three series, labelled by `url`:
//!
//! - `uptime_check_success_total` - probes that got an HTTP response
//! - `uptime_check_failure_total` - probes that failed at the transport level
//! - `uptime_check_duration_seconds` - latency histogram of successful probes
//!
//! Series are created lazily on the first observation for an endpoint and are
//! never reset. The store is owned by the entry point and shared as an
//! `Arc<MetricsStore>`; there is no global registry.
//!
//! ## Consistency
//!
//! A success is two mutations (counter + histogram). Recorders hold the shared
//! side of a reader/writer gate while applying them, so recorders never wait on
//! each other. [`MetricsStore::export`] takes the exclusive side only while
//! gathering, which means an export sees every record either fully or not at
//! all. Encoding happens after the gate is released.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::trace;

use crate::Endpoint;

pub const SUCCESS_TOTAL: &str = "uptime_check_success_total";
pub const FAILURE_TOTAL: &str = "uptime_check_failure_total";
pub const DURATION_SECONDS: &str = "uptime_check_duration_seconds";

const URL_LABEL: &str = "url";

/// Latency buckets in seconds
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Errors raised by the metrics store
#[derive(Debug)]
pub enum MetricsError {
    /// A metric could not be created or registered
    Registration(prometheus::Error),

    /// Gathered metrics could not be encoded
    Encode(prometheus::Error),

    /// The encoder produced invalid UTF-8
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Registration(err) => write!(f, "failed to register metric: {}", err),
            MetricsError::Encode(err) => write!(f, "failed to encode metrics: {}", err),
            MetricsError::Utf8(err) => write!(f, "encoded metrics are not valid UTF-8: {}", err),
        }
    }
}

impl std::error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricsError::Registration(err) | MetricsError::Encode(err) => Some(err),
            MetricsError::Utf8(err) => Some(err),
        }
    }
}

/// Read-only view of one endpoint's series, taken from a consistent snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EndpointStats {
    pub success: u64,
    pub failure: u64,
    /// Number of latency observations
    pub latency_count: u64,
    /// Sum of observed latencies in seconds
    pub latency_sum: f64,
}

impl EndpointStats {
    /// Total number of checks recorded for the endpoint
    pub fn total(&self) -> u64 {
        self.success + self.failure
    }
}

/// Thread-safe store of per-endpoint probe metrics
pub struct MetricsStore {
    registry: Registry,
    success: IntCounterVec,
    failure: IntCounterVec,
    latency: HistogramVec,
    gate: RwLock<()>,
}

impl fmt::Debug for MetricsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsStore").finish_non_exhaustive()
    }
}

impl MetricsStore {
    /// Create an empty store with its own private registry
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let success = IntCounterVec::new(
            Opts::new(SUCCESS_TOTAL, "Number of successful URL checks"),
            &[URL_LABEL],
        )
        .map_err(MetricsError::Registration)?;

        let failure = IntCounterVec::new(
            Opts::new(FAILURE_TOTAL, "Number of failed URL checks"),
            &[URL_LABEL],
        )
        .map_err(MetricsError::Registration)?;

        let latency = HistogramVec::new(
            HistogramOpts::new(DURATION_SECONDS, "Duration of URL checks")
                .buckets(LATENCY_BUCKETS.to_vec()),
            &[URL_LABEL],
        )
        .map_err(MetricsError::Registration)?;

        registry
            .register(Box::new(success.clone()))
            .map_err(MetricsError::Registration)?;
        registry
            .register(Box::new(failure.clone()))
            .map_err(MetricsError::Registration)?;
        registry
            .register(Box::new(latency.clone()))
            .map_err(MetricsError::Registration)?;

        Ok(Self {
            registry,
            success,
            failure,
            latency,
            gate: RwLock::new(()),
        })
    }

    /// Count a successful check and add its latency to the histogram
    pub fn record_success(&self, endpoint: &Endpoint, latency_seconds: f64) {
        let _guard = self.shared();
        self.success.with_label_values(&[endpoint.as_str()]).inc();
        self.latency
            .with_label_values(&[endpoint.as_str()])
            .observe(latency_seconds);
        trace!("{endpoint}: recorded success ({latency_seconds:.3}s)");
    }

    /// Count a failed check
    pub fn record_failure(&self, endpoint: &Endpoint) {
        let _guard = self.shared();
        self.failure.with_label_values(&[endpoint.as_str()]).inc();
        trace!("{endpoint}: recorded failure");
    }

    /// Render every series in the text exposition format
    pub fn export(&self) -> Result<String, MetricsError> {
        let families = self.gather();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(MetricsError::Encode)?;

        String::from_utf8(buffer).map_err(MetricsError::Utf8)
    }

    /// Content type of [`MetricsStore::export`] output
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Current values for a single endpoint, `None` if it was never observed
    pub fn stats(&self, endpoint: &Endpoint) -> Option<EndpointStats> {
        self.snapshot().remove(endpoint)
    }

    /// Current values for every observed endpoint
    pub fn snapshot(&self) -> HashMap<Endpoint, EndpointStats> {
        let mut stats: HashMap<Endpoint, EndpointStats> = HashMap::new();

        for family in self.gather() {
            for metric in family.get_metric() {
                let Some(url) = metric
                    .get_label()
                    .iter()
                    .find(|label| label.get_name() == URL_LABEL)
                    .map(|label| Endpoint::new(label.get_value()))
                else {
                    continue;
                };

                let entry = stats.entry(url).or_default();
                match family.get_name() {
                    SUCCESS_TOTAL => entry.success = metric.get_counter().get_value() as u64,
                    FAILURE_TOTAL => entry.failure = metric.get_counter().get_value() as u64,
                    DURATION_SECONDS => {
                        let histogram = metric.get_histogram();
                        entry.latency_count = histogram.get_sample_count();
                        entry.latency_sum = histogram.get_sample_sum();
                    }
                    _ => {}
                }
            }
        }

        stats
    }

    fn gather(&self) -> Vec<MetricFamily> {
        let _guard = self.exclusive();
        self.registry.gather()
    }

    // The gate guards no data of its own, so a poisoned lock is still usable.
    fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }
}
