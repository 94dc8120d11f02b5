//! Long-running background refresh of the catalog and the weekly totals.

use std::{future::Future, time::Duration};

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::{
    aggregate::Aggregator, catalog::CatalogCache, error::Result, remote::TimerService,
};

/// How often each refresh runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub tasks: Duration,
    pub entries: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            tasks: Duration::from_secs(10 * 60),
            entries: Duration::from_secs(5 * 60),
        }
    }
}

pub struct Scheduler<C> {
    catalog: CatalogCache<C>,
    aggregator: Aggregator<C>,
    intervals: PollIntervals,
}

impl<C: TimerService> Scheduler<C> {
    pub fn new(catalog: CatalogCache<C>, aggregator: Aggregator<C>, intervals: PollIntervals) -> Self {
        Self {
            catalog,
            aggregator,
            intervals,
        }
    }

    /// Run both refresh loops forever. Each fires immediately, then on its own interval.
    pub async fn run(&self) {
        info!(
            tasks_interval_secs = self.intervals.tasks.as_secs(),
            entries_interval_secs = self.intervals.entries.as_secs(),
            "Poll scheduler started"
        );

        tokio::join!(
            poll("entries", self.intervals.entries, move || self.aggregator.refresh()),
            poll("tasks", self.intervals.tasks, move || self.catalog.refresh()),
        );
    }
}

/// Call `refresh` every `every`. A late tick is delayed rather than bursted, so a refresh never
/// overlaps itself, and a failed cycle does not cancel the next one.
async fn poll<F, Fut, T>(name: &'static str, every: Duration, mut refresh: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(e) = refresh().await {
            error!(refresh = name, error = %e, "Scheduled refresh failed");
        }
    }
}
