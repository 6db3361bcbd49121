//! Read-side views over a [`TaskStore`].
//!
//! Listings, the expiring-soon surface and per-owner statistics. All
//! expiration figures come from the caller's [`ExpirationEngine`], the same
//! one the sweeps use.

use super::error::{Result, TaskError};
use super::expiration::ExpirationEngine;
use super::store::TaskStore;
use super::task::{Category, Priority, Task, TaskId};
use chrono::{DateTime, Utc};

/// A task inside its warning window, with whole hours left before deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiringTask {
    pub task: Task,
    pub hours_until_deletion: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    /// `None` stands for uncategorized tasks.
    pub category: Option<Category>,
    pub total: usize,
    pub completed: usize,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub completion_rate: u32,
    /// Daily, weekly, monthly, then uncategorized.
    pub by_category: Vec<CategoryStats>,
    /// High, medium, low.
    pub by_priority: Vec<(Priority, usize)>,
}

/// Unfinished tasks of `owner` currently in their warning window.
pub fn get_tasks_expiring_soon<S: TaskStore + ?Sized>(
    store: &S,
    engine: &ExpirationEngine,
    owner: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ExpiringTask>> {
    let tasks = store.list_tasks_for_user(owner)?;
    Ok(tasks
        .into_iter()
        .filter(|task| engine.is_expiring_soon(task, now))
        .filter_map(|task| {
            let hours_until_deletion = engine.hours_until_deletion(&task, now)?;
            Some(ExpiringTask { task, hours_until_deletion })
        })
        .collect())
}

/// Single-task check for detail views.
pub fn is_task_expiring_soon(engine: &ExpirationEngine, task: &Task, now: DateTime<Utc>) -> bool {
    engine.is_expiring_soon(task, now)
}

/// Tasks of `owner` that have reached their expiration and await the sweep.
pub fn get_expired_tasks<S: TaskStore + ?Sized>(
    store: &S,
    engine: &ExpirationEngine,
    owner: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Task>> {
    let tasks = store.list_tasks_for_user(owner)?;
    Ok(tasks.into_iter().filter(|task| engine.should_delete(task, now)).collect())
}

/// Fetches one task on behalf of `owner`.
pub fn get_task_for_owner<S: TaskStore + ?Sized>(store: &S, id: TaskId, owner: &str) -> Result<Task> {
    let task = store.get_task(id)?.ok_or(TaskError::NotFound(id))?;
    task.ensure_owner(owner)?;
    Ok(task)
}

pub fn list_tasks<S: TaskStore + ?Sized>(store: &S, owner: &str) -> Result<Vec<Task>> {
    store.list_tasks_for_user(owner)
}

/// Tasks in one category (`None` for uncategorized), high priority first,
/// then newest first.
pub fn tasks_by_category<S: TaskStore + ?Sized>(store: &S, owner: &str, category: Option<Category>) -> Result<Vec<Task>> {
    let mut tasks: Vec<Task> = store
        .list_tasks_for_user(owner)?
        .into_iter()
        .filter(|task| task.category() == category)
        .collect();
    tasks.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    Ok(tasks)
}

/// Tasks with the given priority, newest first.
pub fn tasks_by_priority<S: TaskStore + ?Sized>(store: &S, owner: &str, priority: Priority) -> Result<Vec<Task>> {
    let mut tasks: Vec<Task> = store
        .list_tasks_for_user(owner)?
        .into_iter()
        .filter(|task| task.priority == priority)
        .collect();
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(tasks)
}

pub fn user_stats<S: TaskStore + ?Sized>(store: &S, owner: &str) -> Result<UserStats> {
    let tasks = store.list_tasks_for_user(owner)?;
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();

    let categories = Category::ALL.iter().copied().map(Some).chain(std::iter::once(None));
    let by_category = categories
        .map(|category| {
            let in_category: Vec<&Task> = tasks.iter().filter(|t| t.category() == category).collect();
            let done = in_category.iter().filter(|t| t.completed).count();
            CategoryStats {
                category,
                total: in_category.len(),
                completed: done,
                completion_rate: completion_rate(done, in_category.len()),
            }
        })
        .collect();

    let by_priority = [Priority::High, Priority::Medium, Priority::Low]
        .into_iter()
        .map(|priority| (priority, tasks.iter().filter(|t| t.priority == priority).count()))
        .collect();

    Ok(UserStats {
        total,
        completed,
        active: total - completed,
        completion_rate: completion_rate(completed, total),
        by_category,
        by_priority,
    })
}

/// Rounded percentage, 0 for an empty set.
fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}
