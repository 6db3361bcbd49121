mod common;

#[cfg(test)]
mod tests {
    use crate::common::{at, new_task, MemoryStore};
    use lapse::db::db::Db;
    use lapse::db::tasks::Tasks;
    use lapse::libs::expiration::ExpirationEngine;
    use lapse::libs::store::TaskStore;
    use lapse::libs::sweep::Sweeper;
    use lapse::libs::task::{Schedule, TaskId};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Store with two expired tasks, one live task and one completed
    /// recurring task that is due for a reset on 2024-01-10.
    struct SweepTestContext {
        store: MemoryStore,
        expired: Vec<TaskId>,
        live: TaskId,
        recurring: TaskId,
    }

    impl TestContext for SweepTestContext {
        fn setup() -> Self {
            let store = MemoryStore::new();

            let expired = vec![
                store.seed(new_task("u1", "Old daily", Schedule::Daily { due: None }), at(2024, 1, 1, 9, 0)).id.unwrap(),
                store.seed(new_task("u2", "Old note", Schedule::Uncategorized { due: None }), at(2024, 1, 2, 9, 0)).id.unwrap(),
            ];
            let live = store
                .seed(new_task("u1", "Fresh weekly", Schedule::Weekly { weekday: None }), at(2024, 1, 8, 9, 0))
                .id
                .unwrap();

            let mut recurring = new_task("u1", "Standup", Schedule::Daily { due: None });
            recurring.is_recurring = true;
            let mut recurring = recurring.into_task(at(2024, 1, 1, 9, 0));
            recurring.completed = true;
            recurring.completed_at = Some(at(2024, 1, 9, 10, 0));
            let recurring = store.put(recurring);

            SweepTestContext { store, expired, live, recurring }
        }
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_purge_deletes_only_expired(ctx: &mut SweepTestContext) {
        let sweeper = Sweeper::new(&ctx.store, ExpirationEngine::utc());
        let report = sweeper.purge_expired(at(2024, 1, 10, 12, 0)).unwrap();

        assert_eq!(report.examined, 4);
        assert_eq!(report.deleted, 2);
        assert_eq!(report.failed, 0);
        let mut remaining = ctx.store.ids();
        remaining.sort();
        assert_eq!(remaining, vec![ctx.live, ctx.recurring]);
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_purge_continues_past_failures(ctx: &mut SweepTestContext) {
        ctx.store.fail_delete(ctx.expired[0]);
        let sweeper = Sweeper::new(&ctx.store, ExpirationEngine::utc());
        let now = at(2024, 1, 10, 12, 0);

        let report = sweeper.purge_expired(now).unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].0, ctx.expired[0]);
        assert!(ctx.store.find(ctx.expired[0]).is_some());
        assert!(ctx.store.find(ctx.expired[1]).is_none());

        ctx.store.heal();
        let retry = sweeper.purge_expired(now).unwrap();
        assert_eq!(retry.deleted, 1);
        assert!(!retry.has_failures());
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_passes_are_idempotent(ctx: &mut SweepTestContext) {
        let sweeper = Sweeper::new(&ctx.store, ExpirationEngine::utc());
        let now = at(2024, 1, 10, 12, 0);

        let first = sweeper.run(now).unwrap();
        assert_eq!(first.purge.deleted, 2);
        assert_eq!(first.reset.reset, 1);

        let second = sweeper.run(now).unwrap();
        assert_eq!(second.purge.deleted, 0);
        assert_eq!(second.reset.reset, 0);
        assert_eq!(second.purge.examined, 2);
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_reset_clears_completion_only(ctx: &mut SweepTestContext) {
        let before = ctx.store.find(ctx.recurring).unwrap();
        let sweeper = Sweeper::new(&ctx.store, ExpirationEngine::utc());
        let now = at(2024, 1, 10, 12, 0);

        let report = sweeper.reset_recurring(now).unwrap();
        assert_eq!(report.reset, 1);

        let after = ctx.store.find(ctx.recurring).unwrap();
        assert!(!after.completed);
        assert_eq!(after.completed_at, None);
        assert_eq!(after.updated_at, now);
        assert_eq!(after.title, before.title);
        assert_eq!(after.schedule, before.schedule);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_reset_failure_is_counted(ctx: &mut SweepTestContext) {
        ctx.store.fail_patch(ctx.recurring);
        let sweeper = Sweeper::new(&ctx.store, ExpirationEngine::utc());

        let report = sweeper.reset_recurring(at(2024, 1, 10, 12, 0)).unwrap();
        assert_eq!(report.reset, 0);
        assert_eq!(report.failed, 1);
        assert!(ctx.store.find(ctx.recurring).unwrap().completed);
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_listing_failure_aborts_pass(ctx: &mut SweepTestContext) {
        ctx.store.fail_listing(true);
        let sweeper = Sweeper::new(&ctx.store, ExpirationEngine::utc());

        assert!(sweeper.purge_expired(at(2024, 1, 10, 12, 0)).is_err());
        assert!(sweeper.reset_recurring(at(2024, 1, 10, 12, 0)).is_err());
        assert_eq!(ctx.store.ids().len(), 4);
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_purge_for_user_leaves_other_owners(ctx: &mut SweepTestContext) {
        let sweeper = Sweeper::new(&ctx.store, ExpirationEngine::utc());
        let report = sweeper.purge_expired_for_user("u1", at(2024, 1, 10, 12, 0)).unwrap();

        assert_eq!(report.examined, 3);
        assert_eq!(report.deleted, 1);
        assert!(ctx.store.find(ctx.expired[1]).is_some());
        assert_eq!(ctx.store.list_tasks_for_user("u2").unwrap().len(), 1);
    }

    #[test_context(SweepTestContext)]
    #[test]
    fn test_sweeper_works_through_trait_object(ctx: &mut SweepTestContext) {
        let store: &dyn TaskStore = &ctx.store;
        let sweeper = Sweeper::new(store, ExpirationEngine::utc());
        assert_eq!(sweeper.purge_expired(at(2024, 1, 10, 12, 0)).unwrap().deleted, 2);
    }

    /// On-disk store whose rows can be corrupted through a second connection.
    struct StoredSweepTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for StoredSweepTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("lapse.db");
            StoredSweepTestContext { _temp_dir: temp_dir, db_path }
        }
    }

    impl StoredSweepTestContext {
        fn tasks(&self) -> Tasks {
            Tasks::from_db(Db::open(&self.db_path).unwrap())
        }

        fn corrupt_priority(&self, id: TaskId) {
            let raw = rusqlite::Connection::open(&self.db_path).unwrap();
            raw.execute("UPDATE tasks SET priority = 'urgent' WHERE id = ?1", [id]).unwrap();
        }
    }

    #[test_context(StoredSweepTestContext)]
    #[test]
    fn test_undecodable_row_does_not_block_purge(ctx: &mut StoredSweepTestContext) {
        let tasks = ctx.tasks();
        let broken = tasks.insert_task(new_task("u1", "Broken", Schedule::Daily { due: None }), at(2024, 1, 1, 9, 0)).unwrap();
        let expired = tasks
            .insert_task(new_task("u1", "Old note", Schedule::Uncategorized { due: None }), at(2024, 1, 2, 9, 0))
            .unwrap();
        let broken_id = broken.id.unwrap();
        ctx.corrupt_priority(broken_id);
        assert!(tasks.list_all_tasks().is_err());

        let sweeper = Sweeper::new(&tasks, ExpirationEngine::utc());
        let now = at(2024, 1, 10, 12, 0);

        let report = sweeper.purge_expired(now).unwrap();
        assert_eq!(report.examined, 2);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors[0].0, broken_id);
        assert_eq!(tasks.get_task(expired.id.unwrap()).ok(), Some(None));

        let per_user = sweeper.purge_expired_for_user("u1", now).unwrap();
        assert_eq!((per_user.deleted, per_user.failed), (0, 1));

        let reset = sweeper.reset_recurring(now).unwrap();
        assert_eq!((reset.reset, reset.failed), (0, 1));
    }
}
