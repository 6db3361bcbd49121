//! Typed errors for the task store and the data-access layer.
//!
//! The expiration engine itself never fails: malformed inputs degrade to the
//! nearest well-defined rule. Errors only arise where tasks are read, written
//! or validated.

use super::task::TaskId;
use thiserror::Error;

/// Errors surfaced by task storage and task mutations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// No task exists with the requested id.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// The task belongs to a different owner than the caller.
    #[error("not authorized to access this task")]
    Unauthorized,

    /// Input failed a length or consistency check.
    #[error("invalid task: {0}")]
    Validation(String),

    /// Underlying SQLite failure.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Store-specific failure that is not a SQLite error.
    #[error("storage error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, TaskError>;
