//! Sweep passes over stored tasks.
//!
//! A purge pass deletes every task the engine says has expired; a reset pass
//! returns completed recurring tasks to the incomplete state once their next
//! occurrence begins. Each task is handled on its own: a stored row that cannot
//! be decoded or a failing delete or patch is logged, counted and skipped,
//! never aborting the pass. Only a failure to list the tasks in the first
//! place aborts it.
//!
//! Both passes are idempotent. Deleted tasks are gone on the next run and
//! reset tasks no longer satisfy the `completed` precondition.

use super::error::Result;
use super::expiration::ExpirationEngine;
use super::recurrence::reset_patch;
use super::store::{TaskScan, TaskStore};
use super::task::TaskId;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Counts from one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub deleted: usize,
    pub reset: usize,
    pub failed: usize,
    pub errors: Vec<(TaskId, String)>,
}

impl SweepReport {
    /// Starts a report with the rows the listing could not decode already
    /// counted as examined and failed.
    fn with_undecodable(undecodable: Vec<(TaskId, String)>) -> Self {
        let mut report = SweepReport::default();
        for (id, error) in undecodable {
            report.examined += 1;
            report.record_failure(id, error);
        }
        report
    }

    fn record_failure(&mut self, id: TaskId, error: String) {
        self.failed += 1;
        self.errors.push((id, error));
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Reports of a full run: the purge pass followed by the reset pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub purge: SweepReport,
    pub reset: SweepReport,
}

pub struct Sweeper<'a, S: TaskStore + ?Sized> {
    store: &'a S,
    engine: ExpirationEngine,
}

impl<'a, S: TaskStore + ?Sized> Sweeper<'a, S> {
    pub fn new(store: &'a S, engine: ExpirationEngine) -> Self {
        Sweeper { store, engine }
    }

    /// Deletes every expired task in the store.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let scan = self.store.scan_all_tasks()?;
        let report = self.purge(scan, now);
        info!(
            examined = report.examined,
            deleted = report.deleted,
            failed = report.failed,
            "expiration sweep finished"
        );
        Ok(report)
    }

    /// Deletes the expired tasks of one owner.
    pub fn purge_expired_for_user(&self, owner: &str, now: DateTime<Utc>) -> Result<SweepReport> {
        let scan = self.store.scan_tasks_for_user(owner)?;
        let report = self.purge(scan, now);
        info!(
            owner,
            examined = report.examined,
            deleted = report.deleted,
            failed = report.failed,
            "expiration sweep for owner finished"
        );
        Ok(report)
    }

    /// Resets every completed recurring task whose next occurrence has begun.
    pub fn reset_recurring(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let scan = self.store.scan_all_tasks()?;
        let mut report = SweepReport::with_undecodable(scan.undecodable);
        let patch = reset_patch(now);

        for task in scan.tasks {
            report.examined += 1;
            if !self.engine.should_reset_recurring(&task, now) {
                continue;
            }
            let Some(id) = task.id else {
                warn!(title = %task.title, "skipping stored task without an id");
                report.failed += 1;
                continue;
            };

            match self.store.patch_task(id, &patch) {
                Ok(true) => {
                    debug!(task_id = id, "reset recurring task");
                    report.reset += 1;
                }
                Ok(false) => debug!(task_id = id, "recurring task vanished before reset"),
                Err(e) => {
                    warn!(task_id = id, error = %e, "failed to reset recurring task");
                    report.record_failure(id, e.to_string());
                }
            }
        }

        info!(
            examined = report.examined,
            reset = report.reset,
            failed = report.failed,
            "recurrence sweep finished"
        );
        Ok(report)
    }

    /// Purge pass, then reset pass. Recurring tasks never expire, so no task
    /// is touched by both.
    pub fn run(&self, now: DateTime<Utc>) -> Result<SweepOutcome> {
        let purge = self.purge_expired(now)?;
        let reset = self.reset_recurring(now)?;
        Ok(SweepOutcome { purge, reset })
    }

    fn purge(&self, scan: TaskScan, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::with_undecodable(scan.undecodable);

        for task in scan.tasks {
            report.examined += 1;
            if !self.engine.should_delete(&task, now) {
                continue;
            }
            let Some(id) = task.id else {
                warn!(title = %task.title, "skipping stored task without an id");
                report.failed += 1;
                continue;
            };

            match self.store.delete_task(id) {
                Ok(true) => {
                    debug!(task_id = id, "deleted expired task");
                    report.deleted += 1;
                }
                // Already gone, e.g. removed by a concurrent sweep.
                Ok(false) => {}
                Err(e) => {
                    warn!(task_id = id, error = %e, "failed to delete expired task");
                    report.record_failure(id, e.to_string());
                }
            }
        }

        report
    }
}
