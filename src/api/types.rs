//! API response types

use serde::{Serialize, Serializer};

use crate::{CheckOutcome, Endpoint, util::round_latency};

/// Banner returned by `GET /`
pub const BANNER: &str = "Uptime Monitor Running";

/// Message returned by `GET /status` when no targets are configured
pub const NO_TARGETS_MESSAGE: &str = "No URLs configured. Add targets under 'urls' in the configuration file.";

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Reported status of one target: the HTTP code, or `"DOWN"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedStatus {
    Code(u16),
    Down,
}

impl Serialize for ReportedStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportedStatus::Code(code) => serializer.serialize_u16(*code),
            ReportedStatus::Down => serializer.serialize_str("DOWN"),
        }
    }
}

/// One line of a status report
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusEntry {
    pub url: Endpoint,
    pub status: ReportedStatus,
    /// Seconds rounded to two decimals, `null` when the target is down
    pub latency: Option<f64>,
}

impl StatusEntry {
    pub fn new(url: Endpoint, outcome: &CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Up {
                status_code,
                latency,
            } => Self {
                url,
                status: ReportedStatus::Code(*status_code),
                latency: Some(round_latency(latency.as_secs_f64())),
            },
            CheckOutcome::Down { .. } => Self {
                url,
                status: ReportedStatus::Down,
                latency: None,
            },
        }
    }
}

/// Response of `GET /status`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum StatusResponse {
    Report(Vec<StatusEntry>),
    NoTargets { message: String },
}

impl StatusResponse {
    pub fn no_targets() -> Self {
        StatusResponse::NoTargets {
            message: NO_TARGETS_MESSAGE.to_string(),
        }
    }
}
