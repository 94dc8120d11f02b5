//! Outbound port to the remote timer service.

#[cfg(test)]
mod mock;

use async_trait::async_trait;
use time::{Date, PrimitiveDateTime};
use timecamp::{Task, TimeEntry, TimecampClient, TimecampError, TimerHandle};

#[cfg(test)]
pub use mock::{Call, MockTimerService};

/// The remote calls the companion depends on.
///
/// Implementations do not retry; a failed call is reported once and the caller decides whether
/// stale local data is good enough.
#[async_trait]
pub trait TimerService: Send + Sync + 'static {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, TimecampError>;

    async fn fetch_entries(&self, from: Date, to: Date) -> Result<Vec<TimeEntry>, TimecampError>;

    async fn start_timer(
        &self,
        task_id: u64,
        started_at: PrimitiveDateTime,
    ) -> Result<TimerHandle, TimecampError>;

    async fn stop_timer(
        &self,
        timer_id: u64,
        stopped_at: PrimitiveDateTime,
    ) -> Result<(), TimecampError>;
}

#[async_trait]
impl TimerService for TimecampClient {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, TimecampError> {
        TimecampClient::fetch_tasks(self).await
    }

    async fn fetch_entries(&self, from: Date, to: Date) -> Result<Vec<TimeEntry>, TimecampError> {
        TimecampClient::fetch_entries(self, from, to).await
    }

    async fn start_timer(
        &self,
        task_id: u64,
        started_at: PrimitiveDateTime,
    ) -> Result<TimerHandle, TimecampError> {
        TimecampClient::start_timer(self, task_id, started_at).await
    }

    async fn stop_timer(
        &self,
        timer_id: u64,
        stopped_at: PrimitiveDateTime,
    ) -> Result<(), TimecampError> {
        TimecampClient::stop_timer(self, timer_id, stopped_at).await
    }
}
