pub mod api;
pub mod config;
pub mod metrics;
pub mod probe;
pub mod registry;
pub mod scheduler;
pub mod util;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use metrics::{EndpointStats, MetricsStore};
pub use probe::{CheckOutcome, Prober};
pub use registry::TargetRegistry;
pub use scheduler::Scheduler;

/// A monitored URL
///
/// Identity is the exact string; it is also the value of the `url` metrics label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Endpoint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Endpoint {
    fn from(value: String) -> Self {
        Self(value)
    }
}
