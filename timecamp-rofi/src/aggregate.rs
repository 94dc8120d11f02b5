//! Daily and weekly totals from the current week's time entries.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use timecamp::TimeEntry;

use crate::{
    active::{ActiveTimer, TimerState},
    clock,
    error::Result,
    remote::TimerService,
    store::{StateDir, ENTRIES_FILE, STATUS_FILE},
};

/// A duration split into whole hours and remaining minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub hours: u64,
    pub minutes: u64,
}

impl Totals {
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            hours: seconds / 3600,
            minutes: (seconds % 3600) / 60,
        }
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub today: Totals,
    pub week: Totals,
}

impl StatusSummary {
    pub fn load(store: &StateDir) -> Result<Self> {
        store
            .read_json(STATUS_FILE)
            .map_err(|e| e.into_cache_miss(STATUS_FILE))
    }
}

/// Persisted entries of the current week.
pub fn load_entries(store: &StateDir) -> Result<Vec<TimeEntry>> {
    store
        .read_json(ENTRIES_FILE)
        .map_err(|e| e.into_cache_miss(ENTRIES_FILE))
}

/// Totals for the day and week containing `now`, including the live part of a running timer.
pub fn summarize(
    entries: &[TimeEntry],
    active: Option<&ActiveTimer>,
    now: PrimitiveDateTime,
) -> StatusSummary {
    let today = now.date();
    let (monday, sunday) = clock::week_window(today);

    let mut today_seconds: u64 = entries
        .iter()
        .filter(|e| e.date == today)
        .map(|e| e.duration)
        .sum();
    let mut week_seconds: u64 = entries.iter().map(|e| e.duration).sum();

    if let Some(timer) = active {
        let started = timer.started_at.date();
        let live = timer.elapsed_seconds(now);
        if started == today {
            today_seconds += live;
        }
        if (monday..=sunday).contains(&started) {
            week_seconds += live;
        }
    }

    StatusSummary {
        today: Totals::from_seconds(today_seconds),
        week: Totals::from_seconds(week_seconds),
    }
}

pub struct Aggregator<C> {
    client: Arc<C>,
    store: StateDir,
}

impl<C: TimerService> Aggregator<C> {
    pub fn new(client: Arc<C>, store: StateDir) -> Self {
        Self { client, store }
    }

    /// Fetch this week's entries and recompute `status.json`. On a network error neither file is
    /// touched.
    pub async fn refresh(&self) -> Result<StatusSummary> {
        self.refresh_at(clock::local_now()).await
    }

    pub(crate) async fn refresh_at(&self, now: PrimitiveDateTime) -> Result<StatusSummary> {
        let (from, to) = clock::week_window(now.date());
        let entries = self.client.fetch_entries(from, to).await?;

        self.store.write_json(ENTRIES_FILE, &entries)?;

        let timer = TimerState::load(&self.store);
        let summary = summarize(&entries, timer.active(), now);
        self.store.write_json(STATUS_FILE, &summary)?;

        tracing::info!(
            entries = entries.len(),
            today = %summary.today,
            week = %summary.week,
            "Time entries refreshed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use time::{
        macros::{date, datetime},
        Date,
    };

    use super::*;
    use crate::{
        error::CampError,
        remote::{Call, MockTimerService},
        store::ACTIVE_FILE,
    };

    // Wednesday
    const NOW: PrimitiveDateTime = datetime!(2024-03-06 12:00:00);

    fn entry(date: Date, duration: u64) -> TimeEntry {
        TimeEntry {
            date,
            duration,
            task_id: 1,
            last_modify: datetime!(2024-03-06 09:00:00),
        }
    }

    fn timer_started_at(started_at: PrimitiveDateTime) -> ActiveTimer {
        ActiveTimer {
            timer_id: 5,
            task_id: 1,
            name: "Coding".to_string(),
            started_at,
        }
    }

    fn week() -> Vec<TimeEntry> {
        vec![
            entry(date!(2024 - 03 - 06), 3600),
            entry(date!(2024 - 03 - 04), 1800),
        ]
    }

    #[test]
    fn totals_without_timer() {
        let summary = summarize(&week(), None, NOW);

        assert_eq!(summary.today.to_string(), "01:00");
        assert_eq!(summary.week.to_string(), "01:30");
    }

    #[test]
    fn running_timer_counts_toward_today_and_week() {
        let timer = timer_started_at(datetime!(2024-03-06 11:50:00));

        let summary = summarize(&week(), Some(&timer), NOW);

        assert_eq!(summary.today.to_string(), "01:10");
        assert_eq!(summary.week.to_string(), "01:40");
    }

    #[test]
    fn timer_from_yesterday_only_counts_toward_week() {
        let timer = timer_started_at(datetime!(2024-03-05 23:00:00));

        let summary = summarize(&week(), Some(&timer), NOW);

        assert_eq!(summary.today.to_string(), "01:00");
        assert_eq!(summary.week.to_string(), "14:30");
    }

    #[test]
    fn minutes_are_floored() {
        assert_eq!(Totals::from_seconds(3599), Totals { hours: 0, minutes: 59 });
        assert_eq!(Totals::from_seconds(37 * 3600 + 61).to_string(), "37:01");
    }

    #[tokio::test]
    async fn refresh_fetches_the_week_and_persists_both_files() {
        let dir = TempDir::new().unwrap();
        let store = StateDir::new(dir.path());
        let client = Arc::new(MockTimerService::new().with_entries(week()));
        store
            .write_json(ACTIVE_FILE, &timer_started_at(datetime!(2024-03-06 11:50:00)))
            .unwrap();
        let aggregator = Aggregator::new(client.clone(), store.clone());

        let summary = aggregator.refresh_at(NOW).await.unwrap();

        assert_eq!(
            client.calls(),
            vec![Call::FetchEntries(date!(2024 - 03 - 04), date!(2024 - 03 - 10))]
        );
        assert_eq!(StatusSummary::load(&store).unwrap(), summary);
        assert_eq!(summary.today.to_string(), "01:10");
        assert_eq!(load_entries(&store).unwrap(), week());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_status() {
        let dir = TempDir::new().unwrap();
        let store = StateDir::new(dir.path());
        let client = Arc::new(MockTimerService::new().with_entries(week()));
        let aggregator = Aggregator::new(client.clone(), store.clone());
        let before = aggregator.refresh_at(NOW).await.unwrap();

        client.set_fail_fetch(true);
        let err = aggregator
            .refresh_at(datetime!(2024-03-07 12:00:00))
            .await
            .unwrap_err();

        assert!(matches!(err, CampError::Network(_)));
        assert_eq!(StatusSummary::load(&store).unwrap(), before);
    }

    #[test]
    fn missing_status_is_cache_miss() {
        let dir = TempDir::new().unwrap();
        let store = StateDir::new(dir.path());

        assert!(matches!(
            StatusSummary::load(&store),
            Err(CampError::CacheMiss { file: STATUS_FILE, .. })
        ));
    }
}
