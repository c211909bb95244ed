//! SQLite-backed contact store.
//!
//! The database lives at `~/.rapport/rapport.db` unless configured otherwise.
//! Account-management flows own the contacts, jobs, identities and
//! communication records; the strength job reads them and writes back only
//! `relationship_strength` and `relationship_strength_time`.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

pub mod types;
pub use types::*;

pub struct ContactDb {
    conn: Connection,
}

impl ContactDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err or when the COMMIT itself fails.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        let result = f(self).and_then(|val| {
            self.conn.execute_batch("COMMIT")?;
            Ok(val)
        });
        if let Err(e) = &result {
            if !self.conn.is_autocommit() {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("Rollback failed after {}: {}", e, rollback_err);
                }
            }
        }
        result
    }

    /// Open (or create) the database at `~/.rapport/rapport.db` and apply the schema.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path, creating parent directories.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, DbError> {
        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.rapport/rapport.db`.
    pub fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".rapport").join("rapport.db"))
    }

    /// Open at `path` if given, otherwise at the default location.
    pub fn open_or_default(path: Option<&Path>) -> Result<Self, DbError> {
        match path {
            Some(p) => Self::open_at(p.to_path_buf()),
            None => Self::open(),
        }
    }
}

pub mod communications;
pub mod contacts;
pub mod identities;

// =============================================================================
// Shared test utilities
// =============================================================================
