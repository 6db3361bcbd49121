//! History of sweep passes.
//!
//! One row per global pass, written by the watcher and by `lapse sweep`.

use crate::db::db::Db;
use crate::libs::sweep::SweepReport;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;

const INSERT_RUN: &str = "INSERT INTO sweep_runs (kind, ran_at, examined, deleted, reset, failed) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_RECENT: &str = "SELECT id, kind, ran_at, examined, deleted, reset, failed FROM sweep_runs ORDER BY ran_at DESC, id DESC LIMIT ?1";
const SELECT_LAST_RAN_AT: &str = "SELECT MAX(ran_at) FROM sweep_runs WHERE kind = ?1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    Purge,
    Reset,
}

impl SweepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SweepKind::Purge => "purge",
            SweepKind::Reset => "reset",
        }
    }

    fn from_column(value: &str) -> Option<Self> {
        match value {
            "purge" => Some(SweepKind::Purge),
            "reset" => Some(SweepKind::Reset),
            _ => None,
        }
    }
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepRun {
    pub id: i64,
    pub kind: SweepKind,
    pub ran_at: DateTime<Utc>,
    pub examined: usize,
    pub deleted: usize,
    pub reset: usize,
    pub failed: usize,
}

pub struct SweepRuns {
    conn: Connection,
}

impl SweepRuns {
    pub fn new() -> Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn from_db(db: Db) -> Self {
        SweepRuns { conn: db.conn }
    }

    pub fn record(&self, kind: SweepKind, report: &SweepReport, now: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            INSERT_RUN,
            params![
                kind.as_str(),
                now.timestamp_millis(),
                report.examined as i64,
                report.deleted as i64,
                report.reset as i64,
                report.failed as i64,
            ],
        )?;
        Ok(())
    }

    /// Latest runs first. Rows with an unknown kind are skipped.
    pub fn recent(&self, limit: usize) -> Result<Vec<SweepRun>> {
        let mut stmt = self.conn.prepare(SELECT_RECENT)?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
            ))
        })?;

        let mut runs = Vec::new();
        for row in rows {
            let (id, kind, ran_at, examined, deleted, reset, failed) = row?;
            let (Some(kind), Some(ran_at)) = (SweepKind::from_column(&kind), DateTime::<Utc>::from_timestamp_millis(ran_at)) else {
                continue;
            };
            runs.push(SweepRun {
                id,
                kind,
                ran_at,
                examined: examined as usize,
                deleted: deleted as usize,
                reset: reset as usize,
                failed: failed as usize,
            });
        }
        Ok(runs)
    }

    pub fn last_run(&self, kind: SweepKind) -> Result<Option<DateTime<Utc>>> {
        let ran_at: Option<i64> = self
            .conn
            .query_row(SELECT_LAST_RAN_AT, params![kind.as_str()], |row| row.get(0))
            .optional()?
            .flatten();
        Ok(ran_at.and_then(DateTime::<Utc>::from_timestamp_millis))
    }
}
