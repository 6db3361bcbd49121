mod common;

#[cfg(test)]
mod tests {
    use crate::common::{at, new_task};
    use chrono::{Duration, TimeZone, Utc};
    use chrono::DateTime;
    use lapse::libs::expiration::{Expiration, ExpirationEngine, ExpiryStatus};
    use lapse::libs::task::{Schedule, Task};

    fn created(schedule: Schedule, created_at: chrono::DateTime<Utc>) -> Task {
        new_task("u1", "Task", schedule).into_task(created_at)
    }

    fn all_schedules() -> Vec<Schedule> {
        vec![
            Schedule::Uncategorized { due: None },
            Schedule::Uncategorized { due: Some(at(2024, 1, 3, 0, 0)) },
            Schedule::Daily { due: None },
            Schedule::Weekly { weekday: None },
            Schedule::Monthly { day: Some(15) },
        ]
    }

    #[test]
    fn test_recurring_tasks_never_expire() {
        let engine = ExpirationEngine::utc();
        for schedule in all_schedules() {
            let mut task = created(schedule, at(2024, 1, 1, 10, 0));
            task.is_recurring = true;

            assert_eq!(engine.compute(&task).expires_at, None);
            for days in [0, 1, 10, 100, 1000] {
                let now = at(2024, 1, 1, 10, 0) + Duration::days(days);
                assert!(!engine.should_delete(&task, now));
                assert!(!engine.is_expiring_soon(&task, now));
            }
            assert_eq!(engine.status(&task, at(2030, 1, 1, 0, 0)), ExpiryStatus::NeverExpires);
        }
    }

    #[test]
    fn test_warning_window_ends_at_expiration() {
        let engine = ExpirationEngine::utc();
        let start = at(2024, 1, 1, 10, 0);

        for schedule in all_schedules() {
            let task = created(schedule, start);
            let expires_at = engine.compute(&task).expires_at.unwrap();

            let mut now = start;
            while now < start + Duration::days(40) {
                if engine.is_expiring_soon(&task, now) {
                    assert!(now < expires_at, "{:?} warns at {} after expiring at {}", schedule, now, expires_at);
                    assert!(!engine.should_delete(&task, now));
                }
                now += Duration::minutes(30);
            }
        }
    }

    #[test]
    fn test_daily_expiration_ignores_time_of_day() {
        let engine = ExpirationEngine::utc();
        let early = created(Schedule::Daily { due: None }, at(2024, 5, 10, 0, 1));
        let late = created(Schedule::Daily { due: None }, at(2024, 5, 10, 23, 59));

        let expected = Utc.with_ymd_and_hms(2024, 5, 12, 23, 59, 59).unwrap() + Duration::milliseconds(999);
        assert_eq!(engine.compute(&early).expires_at, Some(expected));
        assert_eq!(engine.compute(&late).expires_at, Some(expected));
    }

    #[test]
    fn test_completed_task_is_deleted_without_warning() {
        let engine = ExpirationEngine::utc();
        let mut task = created(Schedule::Daily { due: None }, at(2024, 1, 1, 10, 0));
        task.completed = true;
        task.completed_at = Some(at(2024, 1, 1, 12, 0));

        let expires_at = engine.compute(&task).expires_at.unwrap();
        for offset_hours in [-30, -24, -1, 0, 1, 48] {
            let now = expires_at + Duration::hours(offset_hours);
            assert!(!engine.is_expiring_soon(&task, now));
        }
        assert!(engine.should_delete(&task, expires_at));
        assert!(engine.should_delete(&task, expires_at + Duration::hours(1)));
    }

    #[test]
    fn test_weekly_example_timeline() {
        let engine = ExpirationEngine::utc();
        let task = created(Schedule::Weekly { weekday: None }, at(2024, 1, 1, 10, 0));

        let expiration = engine.compute(&task);
        let expires_at = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap() + Duration::milliseconds(999);
        assert_eq!(expiration.expires_at, Some(expires_at));
        assert_eq!(expiration.warning_starts_at, Some(expires_at - Duration::hours(24)));

        assert!(!engine.is_expiring_soon(&task, at(2024, 1, 8, 12, 0)));
        assert!(engine.is_expiring_soon(&task, at(2024, 1, 9, 0, 0)));
        assert!(!engine.should_delete(&task, at(2024, 1, 9, 23, 0)));
        assert!(engine.should_delete(&task, at(2024, 1, 10, 0, 0)));
    }

    #[test]
    fn test_monthly_expires_after_thirty_one_days() {
        let engine = ExpirationEngine::utc();
        let task = created(Schedule::Monthly { day: Some(1) }, at(2024, 2, 1, 8, 0));
        let expected = Utc.with_ymd_and_hms(2024, 3, 3, 23, 59, 59).unwrap() + Duration::milliseconds(999);
        assert_eq!(engine.compute(&task).expires_at, Some(expected));
    }

    #[test]
    fn test_uncategorized_without_due_date() {
        let engine = ExpirationEngine::utc();
        let task = created(Schedule::Uncategorized { due: None }, at(2024, 1, 1, 10, 0));

        let expiration = engine.compute(&task);
        assert_eq!(expiration.expires_at, Some(at(2024, 1, 2, 10, 0)));
        assert_eq!(expiration.warning_starts_at, Some(at(2024, 1, 1, 22, 0)));
        assert!(!engine.is_expiring_soon(&task, at(2024, 1, 1, 21, 59)));
        assert!(engine.is_expiring_soon(&task, at(2024, 1, 1, 22, 0)));
    }

    #[test]
    fn test_uncategorized_warns_once_overdue() {
        let engine = ExpirationEngine::utc();
        let mut task = created(Schedule::Uncategorized { due: Some(at(2024, 1, 5, 0, 0)) }, at(2024, 1, 1, 10, 0));
        task.due_time = Some("2:30 PM".to_string());

        let expiration = engine.compute(&task);
        assert_eq!(expiration.warning_starts_at, Some(at(2024, 1, 5, 14, 30)));
        assert_eq!(expiration.expires_at, Some(at(2024, 1, 6, 14, 30)));

        assert!(!engine.is_expiring_soon(&task, at(2024, 1, 5, 14, 29)));
        assert_eq!(
            engine.status(&task, at(2024, 1, 5, 15, 0)),
            ExpiryStatus::ExpiringSoon { hours_left: 24 }
        );
        assert_eq!(engine.status(&task, at(2024, 1, 6, 14, 30)), ExpiryStatus::Expired);
    }

    #[test]
    fn test_malformed_due_time_falls_back_to_end_of_day() {
        let engine = ExpirationEngine::utc();
        let mut task = created(Schedule::Uncategorized { due: Some(at(2024, 1, 5, 0, 0)) }, at(2024, 1, 1, 10, 0));
        task.due_time = Some("half past two".to_string());

        let end_of_due_day = Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 59).unwrap() + Duration::milliseconds(999);
        assert_eq!(engine.compute(&task).expires_at, Some(end_of_due_day + Duration::hours(24)));
    }

    #[test]
    fn test_daily_due_date_does_not_change_expiration() {
        let engine = ExpirationEngine::utc();
        let plain = created(Schedule::Daily { due: None }, at(2024, 1, 1, 10, 0));
        let with_due = created(Schedule::Daily { due: Some(at(2024, 2, 1, 0, 0)) }, at(2024, 1, 1, 10, 0));
        assert_eq!(engine.compute(&plain), engine.compute(&with_due));
    }

    #[test]
    fn test_day_boundary_follows_engine_offset() {
        // 23:30 UTC on Jan 1 is already Jan 2 at UTC+2.
        let utc = ExpirationEngine::utc();
        let east = ExpirationEngine::from_offset_minutes(120).unwrap();
        let task = created(Schedule::Daily { due: None }, at(2024, 1, 1, 23, 30));

        let utc_expiry = utc.compute(&task).expires_at.unwrap();
        let east_expiry = east.compute(&task).expires_at.unwrap();
        assert_eq!(utc_expiry, Utc.with_ymd_and_hms(2024, 1, 3, 23, 59, 59).unwrap() + Duration::milliseconds(999));
        assert_eq!(east_expiry, Utc.with_ymd_and_hms(2024, 1, 4, 21, 59, 59).unwrap() + Duration::milliseconds(999));
    }

    #[test]
    fn test_compute_is_independent_of_now() {
        let engine = ExpirationEngine::utc();
        let task = created(Schedule::Weekly { weekday: None }, at(2024, 1, 1, 10, 0));
        let first = engine.compute(&task);
        assert_eq!(engine.hours_until_deletion(&task, at(2024, 1, 9, 22, 0)), Some(2));
        assert_eq!(engine.compute(&task), first);
    }

    #[test]
    fn test_due_at_end_of_time_never_expires() {
        let west = ExpirationEngine::from_offset_minutes(-14 * 60).unwrap();
        let east = ExpirationEngine::from_offset_minutes(14 * 60).unwrap();
        let now = at(2024, 1, 1, 10, 0);

        let mut task = created(Schedule::Uncategorized { due: Some(DateTime::<Utc>::MAX_UTC) }, now);
        for engine in [ExpirationEngine::utc(), west, east] {
            assert_eq!(engine.compute(&task), Expiration::NEVER);
            assert!(!engine.should_delete(&task, now));
            assert!(!engine.is_expiring_soon(&task, now));
            assert_eq!(engine.hours_until_deletion(&task, now), None);
        }

        task.due_time = Some("11:59 PM".to_string());
        assert_eq!(east.compute(&task), Expiration::NEVER);
    }

    #[test]
    fn test_creation_at_range_edges_never_expires() {
        let engine = ExpirationEngine::from_offset_minutes(-14 * 60).unwrap();
        let undated = [
            Schedule::Uncategorized { due: None },
            Schedule::Daily { due: None },
            Schedule::Weekly { weekday: None },
            Schedule::Monthly { day: Some(15) },
        ];
        for schedule in undated {
            let latest = created(schedule.clone(), DateTime::<Utc>::MAX_UTC);
            assert_eq!(engine.status(&latest, at(2024, 1, 1, 0, 0)), ExpiryStatus::NeverExpires);

            let earliest = created(schedule, DateTime::<Utc>::MIN_UTC);
            assert!(engine.should_delete(&earliest, at(2024, 1, 1, 0, 0)));
        }
    }
}
