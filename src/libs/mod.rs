//! Engine, storage seam and infrastructure.
//!
//! ## Usage
//!
//! ```rust
//! use lapse::libs::expiration::ExpirationEngine;
//! use lapse::libs::task::{NewTask, Priority, Schedule};
//! use chrono::{TimeZone, Utc};
//!
//! let engine = ExpirationEngine::utc();
//! let mut new_task = NewTask::new("local", "Pay rent", Priority::High);
//! new_task.schedule = Schedule::Monthly { day: Some(1) };
//! let task = new_task.into_task(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
//! assert!(!engine.should_delete(&task, Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()));
//! ```

pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod due_time;
pub mod error;
pub mod expiration;
pub mod messages;
pub mod operations;
pub mod policy;
pub mod queries;
pub mod recurrence;
pub mod store;
pub mod sweep;
pub mod task;
pub mod view;
