//! Builds the picker menu from the catalog and timer state, and maps the choice back to a
//! timer transition.

use std::{collections::HashMap, sync::Arc};

use itertools::Itertools;
use time::PrimitiveDateTime;
use timecamp::{Task, TimeEntry};

use crate::{
    active::{ActiveTimer, ActiveTimerState, Transition},
    aggregate::{self, StatusSummary},
    catalog::TaskCatalog,
    clock,
    error::Result,
    notify::Notifier,
    picker::Picker,
    remote::TimerService,
    store::StateDir,
};

pub const STOP_PREFIX: &str = "Stop Task:";

/// What a picked line refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Stop,
    Task(Task),
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Cancelled,
    Changed(Transition),
}

pub fn render_task(group: &Task, task: &Task) -> String {
    format!("{}: {}", group.name, task.name)
}

/// Menu lines: an optional stop entry with a separator, then every leaf task, most recently used
/// first and alphabetical among equals. Tasks without entries count as never used.
pub fn build_menu(
    catalog: &TaskCatalog,
    active: Option<&ActiveTimer>,
    entries: &[TimeEntry],
) -> Vec<String> {
    let mut last_used: HashMap<u64, PrimitiveDateTime> = HashMap::new();
    for entry in entries {
        last_used
            .entry(entry.task_id)
            .and_modify(|last| *last = (*last).max(entry.last_modify))
            .or_insert(entry.last_modify);
    }

    let tasks = catalog
        .leaves()
        .map(|(group, task)| (last_used.get(&task.task_id).copied(), render_task(group, task)))
        // `None` orders before `Some`, so never-used tasks end up last.
        .sorted_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, line)| line);

    let mut lines = Vec::new();
    if let Some(timer) = active {
        let stop = format!("{} {}", STOP_PREFIX, timer.name);
        let separator = "-".repeat(stop.chars().count());
        lines.push(stop);
        lines.push(separator);
    }
    lines.extend(tasks);
    lines
}

pub fn resolve_selection(text: &str, catalog: &TaskCatalog) -> Selection {
    if text.starts_with(STOP_PREFIX) {
        return Selection::Stop;
    }

    catalog
        .leaves()
        .find(|(group, task)| render_task(group, task) == text)
        .map(|(_, task)| Selection::Task(task.clone()))
        .unwrap_or(Selection::NoMatch)
}

/// Header shown above the menu.
pub fn picker_message(
    status: Option<&StatusSummary>,
    active: Option<&ActiveTimer>,
    now: PrimitiveDateTime,
) -> String {
    let mut lines = Vec::new();
    if let Some(status) = status {
        lines.push(format!(
            "Today: {}, this week: {}.",
            status.today, status.week
        ));
    }
    if let Some(timer) = active {
        lines.push(format!(
            "You started working on {} {}.",
            timer.name,
            clock::humanize_since(timer.started_at, now)
        ));
    }
    lines.join("\n")
}

pub struct Menu<C, N, P> {
    timers: ActiveTimerState<C, N>,
    picker: Arc<P>,
    store: StateDir,
}

impl<C: TimerService, N: Notifier, P: Picker> Menu<C, N, P> {
    pub fn new(timers: ActiveTimerState<C, N>, picker: Arc<P>, store: StateDir) -> Self {
        Self {
            timers,
            picker,
            store,
        }
    }

    pub async fn run(&self) -> Result<MenuOutcome> {
        // Without a catalog there is nothing meaningful to show.
        let catalog = TaskCatalog::load(&self.store)?;

        let entries = aggregate::load_entries(&self.store).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "No entries cached, ordering menu by name");
            Vec::new()
        });
        let status = StatusSummary::load(&self.store).ok();
        let state = self.timers.read();

        let lines = build_menu(&catalog, state.active(), &entries);
        let message = picker_message(status.as_ref(), state.active(), clock::local_now());

        let Some(choice) = self.picker.pick(&lines, &message).await? else {
            return Ok(MenuOutcome::Cancelled);
        };

        match resolve_selection(&choice, &catalog) {
            Selection::Stop => Ok(MenuOutcome::Changed(self.timers.stop().await?)),
            Selection::Task(task) => Ok(MenuOutcome::Changed(self.timers.start(&task).await?)),
            Selection::NoMatch => {
                tracing::debug!(%choice, "Choice matches no task");
                Ok(MenuOutcome::Cancelled)
            }
        }
    }
}
