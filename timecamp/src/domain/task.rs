use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::lenient;

/// A task as returned by `GET tasks`.
///
/// Tasks form a two-level tree: groups have `parent_id == 0`, leaves point at their group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "lenient::u64_from_any")]
    pub task_id: u64,
    #[serde(deserialize_with = "lenient::u64_from_any")]
    pub parent_id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::flag_from_any")]
    pub archived: bool,
}

/// The tasks endpoint answers either with a plain array or with an object keyed by task id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TasksResponse {
    List(Vec<Task>),
    Keyed(HashMap<String, Task>),
}

impl TasksResponse {
    /// Flatten into a list. Keyed responses are ordered by task id, which is the order the
    /// service itself lists them in.
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            TasksResponse::List(tasks) => tasks,
            TasksResponse::Keyed(map) => {
                let mut tasks: Vec<Task> = map.into_values().collect();
                tasks.sort_by_key(|t| t.task_id);
                tasks
            }
        }
    }
}
