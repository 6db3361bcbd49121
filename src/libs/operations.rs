//! Task mutations on behalf of an owner.
//!
//! Every operation on an existing task checks ownership first: a missing id
//! is `NotFound`, someone else's task is `Unauthorized`.

use super::error::{Result, TaskError};
use super::expiration::ExpirationEngine;
use super::queries::get_task_for_owner;
use super::store::TaskStore;
use super::sweep::{SweepReport, Sweeper};
use super::task::{NewTask, Task, TaskId, TaskPatch};
use chrono::{DateTime, Utc};
use tracing::debug;

pub fn add_task<S: TaskStore + ?Sized>(store: &S, task: NewTask, now: DateTime<Utc>) -> Result<Task> {
    task.validate()?;
    let task = store.insert_task(task, now)?;
    debug!(task_id = ?task.id, owner = %task.owner, "task created");
    Ok(task)
}

/// Flips the completion state. Completing stamps `completed_at`, reopening
/// clears it.
pub fn toggle_task<S: TaskStore + ?Sized>(store: &S, id: TaskId, owner: &str, now: DateTime<Utc>) -> Result<Task> {
    let mut task = get_task_for_owner(store, id, owner)?;
    let completed = !task.completed;
    let patch = TaskPatch {
        completed: Some(completed),
        completed_at: Some(completed.then_some(now)),
        updated_at: Some(now),
        ..Default::default()
    };

    if !store.patch_task(id, &patch)? {
        return Err(TaskError::NotFound(id));
    }
    patch.apply_to(&mut task);
    Ok(task)
}

/// Applies `patch` after validating the merged result. A completed task
/// that becomes recurring starts over as incomplete.
///
/// Changing `completed` without an explicit `completed_at` stamps or clears
/// it the way [`toggle_task`] does; an explicit value that disagrees with
/// the completion state is rejected.
pub fn update_task<S: TaskStore + ?Sized>(store: &S, id: TaskId, owner: &str, patch: TaskPatch, now: DateTime<Utc>) -> Result<Task> {
    let current = get_task_for_owner(store, id, owner)?;

    let mut patch = patch;
    patch.updated_at = Some(now);
    if let Some(completed) = patch.completed {
        if patch.completed_at.is_none() && completed != current.completed {
            patch.completed_at = Some(completed.then_some(now));
        }
    }

    let mut merged = current.clone();
    patch.apply_to(&mut merged);
    merged.validate()?;
    if patch.completed.is_some() || patch.completed_at.is_some() {
        merged.validate_completion()?;
    }

    if merged.is_recurring && !current.is_recurring && merged.completed {
        patch.completed = Some(false);
        patch.completed_at = Some(None);
        patch.apply_to(&mut merged);
    }

    if !store.patch_task(id, &patch)? {
        return Err(TaskError::NotFound(id));
    }
    Ok(merged)
}

pub fn delete_task<S: TaskStore + ?Sized>(store: &S, id: TaskId, owner: &str) -> Result<()> {
    get_task_for_owner(store, id, owner)?;
    if !store.delete_task(id)? {
        return Err(TaskError::NotFound(id));
    }
    Ok(())
}

/// Removes every task of `owner`, returning how many were removed.
pub fn clear_all_tasks<S: TaskStore + ?Sized>(store: &S, owner: &str) -> Result<usize> {
    store.delete_all_for_user(owner)
}

/// Client-triggered deletion pass limited to one owner's tasks.
pub fn purge_expired_for_user<S: TaskStore + ?Sized>(
    store: &S,
    engine: &ExpirationEngine,
    owner: &str,
    now: DateTime<Utc>,
) -> Result<SweepReport> {
    Sweeper::new(store, *engine).purge_expired_for_user(owner, now)
}
