//! API shared state

use std::sync::Arc;

use crate::{MetricsStore, Prober, TargetRegistry};

/// Shared state passed to all API handlers
///
/// The store is the same one the scheduler's prober records into.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Targets checked by `/status`
    pub registry: TargetRegistry,

    /// Prober used for on-demand checks
    pub prober: Prober,
}

impl ApiState {
    pub fn new(registry: TargetRegistry, prober: Prober) -> Self {
        Self { registry, prober }
    }

    pub fn metrics(&self) -> &Arc<MetricsStore> {
        self.prober.metrics()
    }
}
