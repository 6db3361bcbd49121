//! Recurrence resetter.
//!
//! A completed recurring task is returned to the incomplete state once its
//! next occurrence begins. Calendar dates are taken in the engine's offset,
//! the same one used for expiration day boundaries.
//!
//! - daily: any later calendar day than the completion day.
//! - weekly with a target weekday: the target weekday, on a later day than
//!   the completion. Without a target: seven calendar days after completion.
//! - monthly with a target day: that day of the month, in a later month than
//!   the completion. Without a target: thirty calendar days after completion.

use super::expiration::ExpirationEngine;
use super::policy::{MONTHLY_FALLBACK_DAYS, WEEKLY_FALLBACK_DAYS};
use super::task::{Category, Task, TaskPatch};
use chrono::{DateTime, Datelike, Utc};

impl ExpirationEngine {
    /// Whether a completed recurring task should reset at `now`.
    ///
    /// Only tasks that are recurring, completed and carry a completion time
    /// qualify, so applying the reset makes the next call return `false`.
    pub fn should_reset_recurring(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if !task.is_recurring || !task.completed {
            return false;
        }
        let Some(completed_at) = task.completed_at else {
            return false;
        };

        let today = self.calendar_date(now);
        let completed_on = self.calendar_date(completed_at);
        if today <= completed_on {
            return false;
        }
        let days_elapsed = (today - completed_on).num_days();

        match task.effective_pattern() {
            Category::Daily => true,
            Category::Weekly => match task.schedule.target_weekday() {
                Some(weekday) => today.weekday() == weekday,
                None => days_elapsed >= WEEKLY_FALLBACK_DAYS,
            },
            Category::Monthly => match task.schedule.target_day_of_month() {
                Some(day) => today.day() == day && (today.year(), today.month()) != (completed_on.year(), completed_on.month()),
                None => days_elapsed >= MONTHLY_FALLBACK_DAYS,
            },
        }
    }
}

/// The patch that starts the next cycle: completion state cleared, every
/// other attribute untouched.
pub fn reset_patch(now: DateTime<Utc>) -> TaskPatch {
    TaskPatch::reset_completion(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::{NewTask, Priority, Schedule};
    use chrono::{TimeZone, Weekday};

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn completed_recurring(schedule: Schedule, completed_at: DateTime<Utc>) -> Task {
        let mut new_task = NewTask::new("u1", "Recurring", Priority::Medium);
        new_task.schedule = schedule;
        new_task.is_recurring = true;
        let mut task = new_task.into_task(at(2023, 12, 1, 8));
        task.completed = true;
        task.completed_at = Some(completed_at);
        task
    }

    #[test]
    fn test_daily_resets_on_next_calendar_day() {
        let engine = ExpirationEngine::utc();
        let task = completed_recurring(Schedule::Daily { due: None }, at(2024, 1, 3, 22));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 3, 23)));
        assert!(engine.should_reset_recurring(&task, at(2024, 1, 4, 0)));
    }

    #[test]
    fn test_clock_going_backwards_never_resets() {
        let engine = ExpirationEngine::utc();
        let task = completed_recurring(Schedule::Daily { due: None }, at(2024, 1, 3, 22));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 1, 12)));
    }

    #[test]
    fn test_weekly_without_target_waits_seven_days() {
        let engine = ExpirationEngine::utc();
        let task = completed_recurring(Schedule::Weekly { weekday: None }, at(2024, 1, 3, 9));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 9, 23)));
        assert!(engine.should_reset_recurring(&task, at(2024, 1, 10, 0)));
    }

    #[test]
    fn test_weekly_target_later_the_same_week() {
        let engine = ExpirationEngine::utc();
        // Completed on Monday, target Wednesday of the same week.
        let task = completed_recurring(Schedule::Weekly { weekday: Some(Weekday::Wed) }, at(2024, 1, 1, 9));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 2, 9)));
        assert!(engine.should_reset_recurring(&task, at(2024, 1, 3, 9)));
    }

    #[test]
    fn test_monthly_target_day() {
        let engine = ExpirationEngine::utc();
        let task = completed_recurring(Schedule::Monthly { day: Some(15) }, at(2024, 1, 15, 9));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 20, 9)));
        assert!(!engine.should_reset_recurring(&task, at(2024, 2, 14, 9)));
        assert!(engine.should_reset_recurring(&task, at(2024, 2, 15, 9)));
    }

    #[test]
    fn test_monthly_without_target_waits_thirty_days() {
        let engine = ExpirationEngine::utc();
        let task = completed_recurring(Schedule::Monthly { day: None }, at(2024, 1, 1, 9));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 30, 9)));
        assert!(engine.should_reset_recurring(&task, at(2024, 1, 31, 0)));
    }

    #[test]
    fn test_uncategorized_recurring_behaves_daily() {
        let engine = ExpirationEngine::utc();
        let task = completed_recurring(Schedule::Uncategorized { due: None }, at(2024, 1, 1, 9));
        assert!(engine.should_reset_recurring(&task, at(2024, 1, 2, 9)));
    }

    #[test]
    fn test_reset_patch_only_touches_completion() {
        let engine = ExpirationEngine::utc();
        let mut task = completed_recurring(Schedule::Weekly { weekday: Some(Weekday::Fri) }, at(2024, 1, 5, 9));
        let now = at(2024, 1, 12, 9);
        assert!(engine.should_reset_recurring(&task, now));

        let before = task.clone();
        reset_patch(now).apply_to(&mut task);
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.updated_at, now);
        assert_eq!(task.schedule, before.schedule);
        assert_eq!(task.is_recurring, before.is_recurring);
        assert!(!engine.should_reset_recurring(&task, now));
    }
}
