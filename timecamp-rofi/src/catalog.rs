//! The cached, archive-filtered, parent-grouped task hierarchy.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use timecamp::Task;

use crate::{
    error::Result,
    remote::TimerService,
    store::{StateDir, TASKS_FILE},
};

const TOP_LEVEL: u64 = 0;

/// Parent id → tasks under that parent, in fetch order. Key `0` holds the groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCatalog(BTreeMap<u64, Vec<Task>>);

impl TaskCatalog {
    /// Group `tasks` by parent, dropping archived ones.
    pub fn build(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut grouped: BTreeMap<u64, Vec<Task>> = BTreeMap::new();
        for task in tasks.into_iter().filter(|t| !t.archived) {
            grouped.entry(task.parent_id).or_default().push(task);
        }
        Self(grouped)
    }

    /// Read the persisted catalog. Absent or malformed is a cache miss, never an empty catalog.
    pub fn load(store: &StateDir) -> Result<Self> {
        store
            .read_json(TASKS_FILE)
            .map_err(|e| e.into_cache_miss(TASKS_FILE))
    }

    pub fn groups(&self) -> &[Task] {
        self.children(TOP_LEVEL)
    }

    pub fn children(&self, parent_id: u64) -> &[Task] {
        self.0.get(&parent_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every `(group, task)` pair, in catalog order.
    pub fn leaves(&self) -> impl Iterator<Item = (&Task, &Task)> {
        self.groups()
            .iter()
            .flat_map(move |group| self.children(group.task_id).iter().map(move |t| (group, t)))
    }

    pub fn task_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Keeps `tasks.json` in sync with the remote task list.
pub struct CatalogCache<C> {
    client: Arc<C>,
    store: StateDir,
}

impl<C: TimerService> CatalogCache<C> {
    pub fn new(client: Arc<C>, store: StateDir) -> Self {
        Self { client, store }
    }

    /// Fetch, filter, group and atomically replace the cache. On a network error the previous
    /// cache is left as it was.
    pub async fn refresh(&self) -> Result<()> {
        let tasks = self.client.fetch_tasks().await?;
        let fetched = tasks.len();

        let catalog = TaskCatalog::build(tasks);
        self.store.write_json(TASKS_FILE, &catalog)?;

        tracing::info!(
            fetched,
            cached = catalog.task_count(),
            groups = catalog.groups().len(),
            "Task catalog refreshed"
        );
        Ok(())
    }

    pub fn load(&self) -> Result<TaskCatalog> {
        TaskCatalog::load(&self.store)
    }
}

#[cfg(test)]
pub(crate) fn task(task_id: u64, parent_id: u64, name: &str) -> Task {
    Task {
        task_id,
        parent_id,
        name: name.to_string(),
        archived: false,
    }
}
