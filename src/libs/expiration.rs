//! Expiration calculator and the warning/deletion predicates built on it.
//!
//! Every consumer (listings, the detail check, the sweep daemon) goes through
//! one [`ExpirationEngine`] so that all of them agree on the day boundary.
//!
//! ## Rules
//!
//! - Recurring tasks never expire.
//! - Categorized tasks expire a fixed offset after the end of their creation
//!   day (23:59:59.999 in the engine's offset), see [`policy`](super::policy).
//!   The warning starts 24 hours before that.
//! - Uncategorized tasks with a due date expire 24 hours after the due
//!   instant (the due date combined with the due time, or the end of the due
//!   day when the time is missing or unparseable). Their warning starts at
//!   the due instant, i.e. as soon as the task is overdue.
//! - Uncategorized tasks without a due date expire 24 hours after creation
//!   and warn 12 hours before that.
//!
//! ## Usage
//!
//! ```rust
//! use lapse::libs::expiration::ExpirationEngine;
//! # use lapse::libs::task::{NewTask, Priority, Schedule};
//! # use chrono::{TimeZone, Utc};
//! let engine = ExpirationEngine::utc();
//! let mut new_task = NewTask::new("u1", "Plan week", Priority::Medium);
//! new_task.schedule = Schedule::Weekly { weekday: None };
//! let task = new_task.into_task(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
//!
//! let expiration = engine.compute(&task);
//! assert!(expiration.expires_at.is_some());
//! ```

use super::due_time::parse_due_time;
use super::policy;
use super::task::{Schedule, Task};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Absolute expiration and warning-onset instants for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Expiration {
    pub expires_at: Option<DateTime<Utc>>,
    pub warning_starts_at: Option<DateTime<Utc>>,
}

impl Expiration {
    pub const NEVER: Expiration = Expiration {
        expires_at: None,
        warning_starts_at: None,
    };
}

/// Where a task stands relative to its expiration at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    NeverExpires,
    Active,
    ExpiringSoon { hours_left: i64 },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationEngine {
    offset: FixedOffset,
}

impl Default for ExpirationEngine {
    fn default() -> Self {
        Self::utc()
    }
}

impl ExpirationEngine {
    pub fn utc() -> Self {
        Self::with_offset(Utc.fix())
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        ExpirationEngine { offset }
    }

    /// Engine whose calendar days are `minutes` east of UTC. Offsets beyond
    /// ±14 hours are rejected.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return None;
        }
        FixedOffset::east_opt(minutes * 60).map(Self::with_offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of `instant` in the engine's offset. At the very edge
    /// of the representable range the UTC date is used instead.
    pub fn calendar_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant
            .naive_utc()
            .checked_add_signed(self.offset_duration())
            .map(|local| local.date())
            .unwrap_or_else(|| instant.date_naive())
    }

    /// 23:59:59.999 on the calendar day containing `instant`, or `None` when
    /// that instant is not representable.
    pub fn end_of_day(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let midnight = self.calendar_date(instant).and_time(NaiveTime::MIN);
        let last_millisecond = midnight.checked_add_signed(Duration::days(1) - Duration::milliseconds(1))?;
        self.local_to_utc(last_millisecond)
    }

    /// Midnight at the start of `date` in the engine's offset.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.local_to_utc(date.and_time(NaiveTime::MIN))
    }

    fn offset_duration(&self) -> Duration {
        Duration::seconds(self.offset.local_minus_utc() as i64)
    }

    fn local_to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        local.checked_sub_signed(self.offset_duration()).map(|utc| utc.and_utc())
    }

    /// Concrete due instant of an uncategorized task: the due date's calendar
    /// day at the due time, or the end of that day when no usable time is set.
    pub fn due_instant(&self, task: &Task) -> Option<DateTime<Utc>> {
        let Schedule::Uncategorized { due: Some(due) } = task.schedule else {
            return None;
        };

        match task.due_time.as_deref().and_then(parse_due_time) {
            Some(time) => self.local_to_utc(self.calendar_date(due).and_time(time)),
            None => self.end_of_day(due),
        }
    }

    /// Computes the expiration and warning-onset instants of `task`.
    ///
    /// The result depends only on the task's attributes, never on the
    /// current time. A task whose instants fall outside the representable
    /// range never expires.
    pub fn compute(&self, task: &Task) -> Expiration {
        if task.is_recurring {
            return Expiration::NEVER;
        }
        self.bounded_expiration(task).unwrap_or(Expiration::NEVER)
    }

    fn bounded_expiration(&self, task: &Task) -> Option<Expiration> {
        let policy = policy::for_category(task.category());
        let (expires_at, warning_starts_at) = match task.schedule {
            Schedule::Uncategorized { due: Some(_) } => {
                let due = self.due_instant(task)?;
                (due.checked_add_signed(policy.grace())?, due)
            }
            Schedule::Uncategorized { due: None } => {
                let expires_at = task.created_at.checked_add_signed(policy.grace())?;
                (expires_at, expires_at.checked_sub_signed(policy.warning_lead())?)
            }
            Schedule::Daily { .. } | Schedule::Weekly { .. } | Schedule::Monthly { .. } => {
                let expires_at = self.end_of_day(task.created_at)?.checked_add_signed(policy.total_offset())?;
                (expires_at, expires_at.checked_sub_signed(policy.warning_lead())?)
            }
        };

        Some(Expiration {
            expires_at: Some(expires_at),
            warning_starts_at: Some(warning_starts_at),
        })
    }

    /// True while `now` is inside the warning window of an unfinished task.
    pub fn is_expiring_soon(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if task.completed {
            return false;
        }
        match self.compute(task) {
            Expiration {
                expires_at: Some(expires_at),
                warning_starts_at: Some(warning_starts_at),
            } => now >= warning_starts_at && now < expires_at,
            _ => false,
        }
    }

    /// True once the task has reached its expiration. Completed tasks still
    /// age out; recurring tasks never do.
    pub fn should_delete(&self, task: &Task, now: DateTime<Utc>) -> bool {
        self.compute(task).expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Whole hours left before deletion, rounded up and never negative.
    /// `None` for tasks that never expire.
    pub fn hours_until_deletion(&self, task: &Task, now: DateTime<Utc>) -> Option<i64> {
        let expires_at = self.compute(task).expires_at?;
        let remaining = (expires_at - now).num_milliseconds();
        if remaining <= 0 {
            return Some(0);
        }
        Some((remaining + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR)
    }

    pub fn status(&self, task: &Task, now: DateTime<Utc>) -> ExpiryStatus {
        let Some(hours_left) = self.hours_until_deletion(task, now) else {
            return ExpiryStatus::NeverExpires;
        };
        if self.should_delete(task, now) {
            ExpiryStatus::Expired
        } else if self.is_expiring_soon(task, now) {
            ExpiryStatus::ExpiringSoon { hours_left }
        } else {
            ExpiryStatus::Active
        }
    }
}
