#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use lapse::libs::error::{Result, TaskError};
use lapse::libs::store::TaskStore;
use lapse::libs::task::{NewTask, Priority, Schedule, Task, TaskId, TaskPatch};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn new_task(owner: &str, title: &str, schedule: Schedule) -> NewTask {
    let mut task = NewTask::new(owner, title, Priority::Medium);
    task.schedule = schedule;
    task
}

/// In-memory store with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    tasks: RefCell<Vec<Task>>,
    next_id: Cell<TaskId>,
    failing_deletes: RefCell<HashSet<TaskId>>,
    failing_patches: RefCell<HashSet<TaskId>>,
    failing_listing: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, task: NewTask, now: DateTime<Utc>) -> Task {
        self.insert_task(task, now).unwrap()
    }

    /// Stores a task as-is, e.g. one already marked completed.
    pub fn put(&self, mut task: Task) -> TaskId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        task.id = Some(id);
        self.tasks.borrow_mut().push(task);
        id
    }

    pub fn fail_delete(&self, id: TaskId) {
        self.failing_deletes.borrow_mut().insert(id);
    }

    pub fn fail_patch(&self, id: TaskId) {
        self.failing_patches.borrow_mut().insert(id);
    }

    pub fn fail_listing(&self, fail: bool) {
        self.failing_listing.set(fail);
    }

    pub fn heal(&self) {
        self.failing_deletes.borrow_mut().clear();
        self.failing_patches.borrow_mut().clear();
        self.failing_listing.set(false);
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.borrow().iter().filter_map(|t| t.id).collect()
    }

    pub fn find(&self, id: TaskId) -> Option<Task> {
        self.tasks.borrow().iter().find(|t| t.id == Some(id)).cloned()
    }
}

impl TaskStore for MemoryStore {
    fn list_tasks_for_user(&self, owner: &str) -> Result<Vec<Task>> {
        Ok(self.list_all_tasks()?.into_iter().filter(|t| t.owner == owner).collect())
    }

    fn list_all_tasks(&self) -> Result<Vec<Task>> {
        if self.failing_listing.get() {
            return Err(TaskError::Backend("listing unavailable".to_string()));
        }
        let mut tasks = self.tasks.borrow().clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.find(id))
    }

    fn insert_task(&self, task: NewTask, now: DateTime<Utc>) -> Result<Task> {
        let mut task = task.into_task(now);
        task.id = Some(self.put(task.clone()));
        Ok(task)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool> {
        if self.failing_deletes.borrow().contains(&id) {
            return Err(TaskError::Backend(format!("delete of {} refused", id)));
        }
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != Some(id));
        Ok(tasks.len() < before)
    }

    fn patch_task(&self, id: TaskId, patch: &TaskPatch) -> Result<bool> {
        if self.failing_patches.borrow().contains(&id) {
            return Err(TaskError::Backend(format!("patch of {} refused", id)));
        }
        let mut tasks = self.tasks.borrow_mut();
        match tasks.iter_mut().find(|t| t.id == Some(id)) {
            Some(task) => {
                patch.apply_to(task);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_all_for_user(&self, owner: &str) -> Result<usize> {
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.owner != owner);
        Ok(before - tasks.len())
    }
}
