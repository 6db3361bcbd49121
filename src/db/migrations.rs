//! Database schema migration management and versioning.
//!
//! Every schema change is a numbered migration recorded in the `migrations`
//! table. Pending migrations run in order inside one transaction when a
//! connection is opened, so a database is either fully upgraded or left as
//! it was.
//!
//! ## Usage
//!
//! ```rust
//! use lapse::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? >= 1);
//! # Ok::<(), rusqlite::Error>(())
//! ```

use rusqlite::{params, Connection, OptionalExtension, Result, Transaction};
use tracing::{debug, error};

const CREATE_MIGRATIONS: &str = "CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";
const INSERT_APPLIED: &str = "INSERT INTO migrations (version, name) VALUES (?1, ?2)";
const SELECT_VERSION: &str = "SELECT MAX(version) FROM migrations";
const COUNT_VERSION: &str = "SELECT COUNT(*) FROM migrations WHERE version = ?1";
const SELECT_HISTORY: &str = "SELECT version, name, applied_at FROM migrations ORDER BY version";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Ordered registry of schema migrations.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: task table and the owner-scoped lookup indexes.
        // Instants are epoch milliseconds. `due_date` is decoded by `category`.
        self.add_migration(1, "create_tasks", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER NOT NULL PRIMARY KEY,
                    owner TEXT NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT,
                    completed BOOLEAN NOT NULL DEFAULT FALSE,
                    completed_at INTEGER,
                    priority TEXT NOT NULL,
                    category TEXT,
                    due_date INTEGER,
                    due_time TEXT,
                    is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
                    recurring_pattern TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_owner_category ON tasks(owner, category)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_owner_priority ON tasks(owner, priority)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date)", [])?;
            Ok(())
        });

        // Version 2: sweep history, one row per completed sweep pass.
        self.add_migration(2, "add_sweep_runs", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS sweep_runs (
                    id INTEGER PRIMARY KEY,
                    kind TEXT NOT NULL,
                    ran_at INTEGER NOT NULL,
                    examined INTEGER NOT NULL,
                    deleted INTEGER NOT NULL,
                    reset INTEGER NOT NULL,
                    failed INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_sweep_runs_ran_at ON sweep_runs(ran_at)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Applies every migration newer than the recorded version, all in one
    /// transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(CREATE_MIGRATIONS, [])?;
        let from = self.get_current_version(conn)?;

        let tx = conn.transaction()?;
        let mut applied = 0;
        for migration in self.migrations.iter().filter(|m| m.version > from) {
            debug!(version = migration.version, name = migration.name, "applying migration");
            (migration.up)(&tx).inspect_err(|e| error!(version = migration.version, error = %e, "migration failed"))?;
            tx.execute(INSERT_APPLIED, params![migration.version, migration.name])?;
            applied += 1;
        }
        tx.commit()?;

        if applied > 0 {
            debug!(from, to = self.latest_version(), applied, "schema upgraded");
        }
        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row(SELECT_VERSION, [], |row| row.get(0)).optional()?.flatten();
        Ok(version.unwrap_or(0))
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i64 = conn.query_row(COUNT_VERSION, params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// `(version, name, applied_at)` rows, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare(SELECT_HISTORY)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        rows.collect()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
