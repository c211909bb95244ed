//! Shared type definitions for the database layer.

use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

impl DbError {
    /// True when SQLite reported the database as busy or locked by another
    /// writer. Everything else is treated as permanent.
    pub fn is_busy(&self) -> bool {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Canonical form of an email address for storage and matching: trimmed and
/// lower-cased with full Unicode case mapping.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A row from the `contacts` table.
#[derive(Debug, Clone, PartialEq)]
pub struct DbContact {
    pub id: String,
    /// Owning user account. `None` for orphaned imports.
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub relationship_strength: f64,
    /// Epoch seconds of the last scoring pass (0 = never scored).
    pub relationship_strength_time: i64,
}

/// An employment record (tenure) for a contact or a global identity.
///
/// `None` bounds mean "unknown"; they are resolved to the current time when
/// overlaps are computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenure {
    pub company: String,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl Tenure {
    pub fn new(company: &str, start_time: Option<i64>, end_time: Option<i64>) -> Self {
        Self {
            company: company.to_string(),
            start_time,
            end_time,
        }
    }
}

/// Communication channels counted toward relationship strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Email,
    Meeting,
    Interaction,
}

impl Channel {
    /// Backing table for this channel's records.
    pub fn table(self) -> &'static str {
        match self {
            Channel::Email => "imported_emails",
            Channel::Meeting => "imported_meetings",
            Channel::Interaction => "interactions",
        }
    }
}

/// Count and most-recent timestamp of one channel's records for one contact.
///
/// `most_recent` is `None` when the contact has no records on the channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelAggregate {
    pub count: u64,
    pub most_recent: Option<i64>,
}

impl ChannelAggregate {
    /// Count to feed into the score formula.
    pub fn count_or_zero(&self) -> u64 {
        self.count
    }

    /// Most-recent timestamp with "no record" collapsed to 0.
    pub fn most_recent_or_zero(&self) -> i64 {
        self.most_recent.unwrap_or(0)
    }
}

/// A contact as loaded for one scoring pass: its row, its own tenures, and
/// the emails of the user who owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSnapshot {
    pub contact: DbContact,
    pub jobs: Vec<Tenure>,
    pub owner_emails: Vec<String>,
}

/// A deferred write of a new score for one contact.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreUpdate {
    pub contact_id: String,
    pub relationship_strength: f64,
    pub relationship_strength_time: i64,
}
