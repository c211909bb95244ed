//! Error types for the strength job.
//!
//! The job never retries on its own. `is_retryable` tells the caller
//! (normally the external scheduler) whether running again later could help.

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum JobError {
    // Storage: propagated untouched from the contact store
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    // Non-retryable
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl JobError {
    /// Returns true if another run could succeed without intervention.
    pub fn is_retryable(&self) -> bool {
        match self {
            JobError::Database(e) => e.is_busy(),
            JobError::ConfigurationError(_) => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            JobError::Database(e) if e.is_busy() => {
                "Another writer holds the database. The next cycle will pick these contacts up again."
            }
            JobError::Database(DbError::HomeDirNotFound) => {
                "Set HOME or pass --db with an explicit database path."
            }
            JobError::Database(DbError::Migration(_)) => {
                "The database schema could not be prepared. Check the pre-migration backup."
            }
            JobError::Database(_) => "Check the database file and its permissions.",
            JobError::ConfigurationError(_) => "Check your configuration in ~/.rapport/config.json",
        }
    }
}
