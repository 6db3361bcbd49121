use super::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "lapse.db";

/// A migrated SQLite connection.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database in the application data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Ok(Self::open(db_file_path)?)
    }

    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Db> {
        Self::prepare(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Db> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(mut conn: Connection) -> rusqlite::Result<Db> {
        // Sweeps from the watcher and CLI writes may overlap on the same file.
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }
}
