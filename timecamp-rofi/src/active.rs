//! The one locally running timer, kept in agreement with the remote timer.
//!
//! `active.json` exists exactly while a timer runs. Transitions prefer showing `Idle` over a
//! `Running` that cannot be verified: a remote timer may be orphaned, a local one never is.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use timecamp::{domain::formats::timestamp_format, Task};

use crate::{
    clock,
    error::Result,
    notify::Notifier,
    remote::TimerService,
    store::{ReadError, StateDir, ACTIVE_FILE},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimer {
    #[serde(alias = "new_timer_id")]
    pub timer_id: u64,
    #[serde(default)]
    pub task_id: u64,
    pub name: String,
    /// Local wall-clock time.
    #[serde(with = "timestamp_format")]
    pub started_at: PrimitiveDateTime,
}

impl ActiveTimer {
    pub fn elapsed_seconds(&self, now: PrimitiveDateTime) -> u64 {
        clock::elapsed_seconds(self.started_at, now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running(ActiveTimer),
}

impl TimerState {
    /// Interpret `active.json`. An unreadable record counts as `Idle`.
    pub fn load(store: &StateDir) -> Self {
        match store.read_json::<ActiveTimer>(ACTIVE_FILE) {
            Ok(timer) => TimerState::Running(timer),
            Err(ReadError::Missing) => TimerState::Idle,
            Err(ReadError::Malformed(reason)) => {
                tracing::warn!(%reason, "Ignoring unreadable active timer record");
                TimerState::Idle
            }
        }
    }

    pub fn active(&self) -> Option<&ActiveTimer> {
        match self {
            TimerState::Running(timer) => Some(timer),
            TimerState::Idle => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `stop()` on an idle state.
    AlreadyIdle,
    Started { replaced: Option<ActiveTimer> },
    /// `remote_confirmed == false` means the remote timer may still be running.
    Stopped {
        stopped: ActiveTimer,
        remote_confirmed: bool,
    },
}

/// Result of a transition: the state now persisted and what happened on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: TimerState,
    pub outcome: Outcome,
}

pub struct ActiveTimerState<C, N> {
    client: Arc<C>,
    notifier: Arc<N>,
    store: StateDir,
}

impl<C: TimerService, N: Notifier> ActiveTimerState<C, N> {
    pub fn new(client: Arc<C>, notifier: Arc<N>, store: StateDir) -> Self {
        Self {
            client,
            notifier,
            store,
        }
    }

    /// Pure read of the persisted state; never touches the network.
    pub fn read(&self) -> TimerState {
        TimerState::load(&self.store)
    }

    /// Start a timer for `task`, stopping whatever runs first.
    pub async fn start(&self, task: &Task) -> Result<Transition> {
        let replaced = match self.read() {
            TimerState::Running(current) => {
                self.stop().await?;
                Some(current)
            }
            TimerState::Idle => None,
        };

        let started_at = clock::local_now();
        let handle = match self.client.start_timer(task.task_id, started_at).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(task_id = task.task_id, error = %e, "Failed to start remote timer");
                return Err(e.into());
            }
        };

        let timer = ActiveTimer {
            timer_id: handle.new_timer_id,
            task_id: task.task_id,
            name: task.name.clone(),
            started_at,
        };

        if let Err(e) = self.store.write_json(ACTIVE_FILE, &timer) {
            tracing::error!(
                timer_id = timer.timer_id,
                error = %e,
                "Failed to persist active timer, stopping remote timer"
            );
            if let Err(stop_err) = self
                .client
                .stop_timer(timer.timer_id, clock::local_now())
                .await
            {
                tracing::warn!(
                    timer_id = timer.timer_id,
                    error = %stop_err,
                    "Remote timer left running"
                );
            }
            return Err(e);
        }

        tracing::info!(
            task_id = timer.task_id,
            timer_id = timer.timer_id,
            entry_id = ?handle.entry_id,
            name = %timer.name,
            "Timer started"
        );
        self.notifier.notify("Task Started", &timer.name).await;

        Ok(Transition {
            state: TimerState::Running(timer),
            outcome: Outcome::Started { replaced },
        })
    }

    /// Stop the running timer. Idempotent: stopping while idle succeeds without side effects.
    pub async fn stop(&self) -> Result<Transition> {
        let current = match self.read() {
            TimerState::Running(current) => current,
            TimerState::Idle => {
                return Ok(Transition {
                    state: TimerState::Idle,
                    outcome: Outcome::AlreadyIdle,
                })
            }
        };

        let remote_confirmed = match self
            .client
            .stop_timer(current.timer_id, clock::local_now())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    timer_id = current.timer_id,
                    error = %e,
                    "Failed to stop remote timer, it may be orphaned"
                );
                false
            }
        };

        // Reporting Idle while the record is still on disk would be contradicted by the next
        // read, so the caller gets the storage error instead.
        if let Err(e) = self.store.remove(ACTIVE_FILE) {
            tracing::error!(
                timer_id = current.timer_id,
                remote_confirmed,
                error = %e,
                "Failed to remove active timer record"
            );
            return Err(e);
        }

        tracing::info!(
            task_id = current.task_id,
            timer_id = current.timer_id,
            remote_confirmed,
            "Timer stopped"
        );
        self.notifier.notify("Task Stopped", &current.name).await;

        Ok(Transition {
            state: TimerState::Idle,
            outcome: Outcome::Stopped {
                stopped: current,
                remote_confirmed,
            },
        })
    }
}
