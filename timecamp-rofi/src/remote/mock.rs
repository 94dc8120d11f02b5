//! In-memory timer service for tests.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::{Date, PrimitiveDateTime};
use timecamp::{Task, TimeEntry, TimecampError, TimerHandle};

use super::TimerService;

/// A recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchTasks,
    FetchEntries(Date, Date),
    Start(u64),
    Stop(u64),
}

pub struct MockTimerService {
    tasks: Mutex<Vec<Task>>,
    entries: Mutex<Vec<TimeEntry>>,
    fail_fetch: AtomicBool,
    fail_start: AtomicBool,
    fail_stop: AtomicBool,
    next_timer_id: AtomicU64,
    calls: Mutex<Vec<Call>>,
}

impl MockTimerService {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            entries: Mutex::new(Vec::new()),
            fail_fetch: AtomicBool::new(false),
            fail_start: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
            next_timer_id: AtomicU64::new(100),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.lock().unwrap() = tasks;
        self
    }

    pub fn with_entries(self, entries: Vec<TimeEntry>) -> Self {
        *self.entries.lock().unwrap() = entries;
        self
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_stop(&self, fail: bool) {
        self.fail_stop.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn unreachable() -> TimecampError {
        TimecampError::ResponseError("connection refused".to_string())
    }
}

impl Default for MockTimerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimerService for MockTimerService {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, TimecampError> {
        self.record(Call::FetchTasks);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn fetch_entries(&self, from: Date, to: Date) -> Result<Vec<TimeEntry>, TimecampError> {
        self.record(Call::FetchEntries(from, to));
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn start_timer(
        &self,
        task_id: u64,
        _started_at: PrimitiveDateTime,
    ) -> Result<TimerHandle, TimecampError> {
        self.record(Call::Start(task_id));
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(TimerHandle {
            new_timer_id: self.next_timer_id.fetch_add(1, Ordering::SeqCst),
            entry_id: None,
        })
    }

    async fn stop_timer(
        &self,
        timer_id: u64,
        _stopped_at: PrimitiveDateTime,
    ) -> Result<(), TimecampError> {
        self.record(Call::Stop(timer_id));
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(())
    }
}
