//! Background scheduler - checks every target on a fixed interval
//!
//! ```text
//! Idle → Running (check_all) → Sleeping (interval) → Running → ...
//! ```
//!
//! The interval is measured from the end of one cycle's checks, so a slow
//! cycle pushes the next one back. With no targets configured the scheduler
//! just sleeps and looks again. The loop never exits on its own.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace};

use crate::{Prober, TargetRegistry};

/// Default pause between two cycles
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Tally of one completed cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub up: usize,
    pub down: usize,
}

/// Periodic checker over all registered targets
#[derive(Debug, Clone)]
pub struct Scheduler {
    registry: TargetRegistry,
    prober: Prober,
    interval: Duration,
}

impl Scheduler {
    pub fn new(registry: TargetRegistry, prober: Prober, interval: Duration) -> Self {
        Self {
            registry,
            prober,
            interval,
        }
    }

    /// Start the loop on a detached task
    ///
    /// Dropping the handle does not stop the task; it ends with the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run cycles forever
    #[instrument(skip_all)]
    pub async fn run(self) {
        info!(
            "starting scheduler for {} targets every {:?}",
            self.registry.len(),
            self.interval
        );

        loop {
            if self.registry.is_empty() {
                trace!("no targets configured, idling");
            } else {
                self.run_cycle().await;
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    /// Check every target once
    ///
    /// Failures are isolated per target and already recorded by the prober.
    pub async fn run_cycle(&self) -> CycleSummary {
        let results = self.prober.check_all(self.registry.targets()).await;

        let summary = results
            .iter()
            .fold(CycleSummary::default(), |mut summary, (_, outcome)| {
                if outcome.is_up() {
                    summary.up += 1;
                } else {
                    summary.down += 1;
                }
                summary
            });

        debug!("cycle finished: {} up, {} down", summary.up, summary.down);

        summary
    }
}
