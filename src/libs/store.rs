//! Storage collaborator interface.
//!
//! The engine only needs list, delete and patch; the remaining methods back
//! the add/toggle/edit flows of the data-access layer.

use super::error::Result;
use super::task::{NewTask, Task, TaskId, TaskPatch};
use chrono::{DateTime, Utc};

/// Result of a sweep listing. Rows the store could not decode are set aside
/// with their id and the decode error instead of failing the whole listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskScan {
    pub tasks: Vec<Task>,
    pub undecodable: Vec<(TaskId, String)>,
}

impl From<Vec<Task>> for TaskScan {
    fn from(tasks: Vec<Task>) -> Self {
        TaskScan {
            tasks,
            undecodable: Vec::new(),
        }
    }
}

pub trait TaskStore {
    /// Tasks of one owner, newest first.
    fn list_tasks_for_user(&self, owner: &str) -> Result<Vec<Task>>;

    /// Every stored task, for global sweeps.
    fn list_all_tasks(&self) -> Result<Vec<Task>>;

    /// Every stored task for a sweep. Stores that can hold rows they fail
    /// to decode report them in [`TaskScan::undecodable`].
    fn scan_all_tasks(&self) -> Result<TaskScan> {
        self.list_all_tasks().map(TaskScan::from)
    }

    /// Like [`TaskStore::scan_all_tasks`], restricted to one owner.
    fn scan_tasks_for_user(&self, owner: &str) -> Result<TaskScan> {
        self.list_tasks_for_user(owner).map(TaskScan::from)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// Stores a new task stamped at `now` and returns it with its id.
    fn insert_task(&self, task: NewTask, now: DateTime<Utc>) -> Result<Task>;

    /// Returns `false` when no such task existed.
    fn delete_task(&self, id: TaskId) -> Result<bool>;

    /// Returns `false` when no such task existed.
    fn patch_task(&self, id: TaskId, patch: &TaskPatch) -> Result<bool>;

    /// Removes every task of `owner` and returns how many were removed.
    fn delete_all_for_user(&self, owner: &str) -> Result<usize>;
}
