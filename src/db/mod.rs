//! SQLite persistence.
//!
//! Every connection is opened through [`db::Db`], which applies pending
//! migrations first.
//!
//! ```rust,no_run
//! use lapse::db::tasks::Tasks;
//! use lapse::libs::store::TaskStore;
//!
//! let tasks = Tasks::new()?;
//! let mine = tasks.list_tasks_for_user("local")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup.
pub mod db;

/// Versioned schema changes.
pub mod migrations;

/// Sweep history.
pub mod sweep_runs;

/// The SQLite task store.
pub mod tasks;
