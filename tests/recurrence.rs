mod common;

#[cfg(test)]
mod tests {
    use crate::common::{at, new_task};
    use chrono::{DateTime, Utc, Weekday};
    use lapse::libs::expiration::ExpirationEngine;
    use lapse::libs::recurrence::reset_patch;
    use lapse::libs::task::{Category, Schedule, Task};

    fn completed_recurring(schedule: Schedule, completed_at: DateTime<Utc>) -> Task {
        let mut new_task = new_task("u1", "Recurring", schedule);
        new_task.is_recurring = true;
        let mut task = new_task.into_task(at(2023, 12, 1, 8, 0));
        task.completed = true;
        task.completed_at = Some(completed_at);
        task
    }

    #[test]
    fn test_reset_check_is_idempotent() {
        let engine = ExpirationEngine::utc();
        let mut task = completed_recurring(Schedule::Daily { due: None }, at(2024, 1, 1, 9, 0));
        let now = at(2024, 1, 2, 9, 0);

        let first = engine.should_reset_recurring(&task, now);
        assert!(first);
        for _ in 0..3 {
            assert_eq!(engine.should_reset_recurring(&task, now), first);
        }

        reset_patch(now).apply_to(&mut task);
        assert!(!engine.should_reset_recurring(&task, now));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 3, 9, 0)));
    }

    #[test]
    fn test_weekly_target_weekday() {
        let engine = ExpirationEngine::utc();
        // Completed on Wednesday 2024-01-03, target Wednesday.
        let task = completed_recurring(Schedule::Weekly { weekday: Some(Weekday::Wed) }, at(2024, 1, 3, 9, 0));

        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 3, 18, 0)));
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 8, 9, 0)));
        assert!(engine.should_reset_recurring(&task, at(2024, 1, 10, 9, 0)));
    }

    #[test]
    fn test_incomplete_or_non_recurring_tasks_never_reset() {
        let engine = ExpirationEngine::utc();
        let now = at(2024, 2, 1, 9, 0);

        let mut open = completed_recurring(Schedule::Daily { due: None }, at(2024, 1, 1, 9, 0));
        open.completed = false;
        assert!(!engine.should_reset_recurring(&open, now));

        let mut one_off = completed_recurring(Schedule::Daily { due: None }, at(2024, 1, 1, 9, 0));
        one_off.is_recurring = false;
        assert!(!engine.should_reset_recurring(&one_off, now));

        let mut no_timestamp = completed_recurring(Schedule::Daily { due: None }, at(2024, 1, 1, 9, 0));
        no_timestamp.completed_at = None;
        assert!(!engine.should_reset_recurring(&no_timestamp, now));
    }

    #[test]
    fn test_monthly_day_missing_from_month_does_not_fire() {
        let engine = ExpirationEngine::utc();
        let task = completed_recurring(Schedule::Monthly { day: Some(31) }, at(2024, 3, 31, 9, 0));

        assert!(!engine.should_reset_recurring(&task, at(2024, 4, 30, 9, 0)));
        assert!(!engine.should_reset_recurring(&task, at(2024, 5, 1, 9, 0)));
        assert!(engine.should_reset_recurring(&task, at(2024, 5, 31, 9, 0)));
    }

    #[test]
    fn test_pattern_overrides_category() {
        let engine = ExpirationEngine::utc();
        let mut task = completed_recurring(Schedule::Weekly { weekday: None }, at(2024, 1, 1, 9, 0));
        task.recurring_pattern = Some(Category::Weekly);
        assert!(!engine.should_reset_recurring(&task, at(2024, 1, 2, 9, 0)));

        // An uncategorized recurring task follows its explicit pattern.
        let mut uncategorized = completed_recurring(Schedule::Uncategorized { due: None }, at(2024, 1, 1, 9, 0));
        uncategorized.recurring_pattern = Some(Category::Monthly);
        assert!(!engine.should_reset_recurring(&uncategorized, at(2024, 1, 2, 9, 0)));
        assert!(engine.should_reset_recurring(&uncategorized, at(2024, 1, 31, 9, 0)));
    }

    #[test]
    fn test_calendar_dates_follow_engine_offset() {
        // Completed 22:00 UTC on Jan 1 = 00:00 Jan 2 at UTC+2.
        let east = ExpirationEngine::from_offset_minutes(120).unwrap();
        let task = completed_recurring(Schedule::Daily { due: None }, at(2024, 1, 1, 22, 0));

        assert!(!east.should_reset_recurring(&task, at(2024, 1, 2, 21, 0)));
        assert!(east.should_reset_recurring(&task, at(2024, 1, 2, 22, 0)));
        assert!(ExpirationEngine::utc().should_reset_recurring(&task, at(2024, 1, 2, 0, 0)));
    }
}
