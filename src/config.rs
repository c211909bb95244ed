//! Job configuration, loaded from `~/.rapport/config.json`.
//!
//! Every field has a default, so a missing file or a partial one is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::JobError;

/// Overlaps that ended less than this long ago (~9 months) do not count
/// toward shared tenure.
pub const PAST_JOB_THRESHOLD_SECS: i64 = 23_650_000;

/// Aged shared tenure at or above this (~3 months) triggers the coworker discount.
pub const COWORKER_SHARED_TIME_CUTOFF_SECS: i64 = 7_884_000;

/// Last correspondence at least this long ago (~1 year) triggers the stale penalty.
pub const LAST_CORRESPONDENCE_CUTOFF_SECS: i64 = 31_540_000;

/// Contacts scored per cycle.
pub const DEFAULT_BATCH_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthConfig {
    #[serde(default = "default_past_job_threshold")]
    pub past_job_threshold_secs: i64,
    #[serde(default = "default_coworker_cutoff")]
    pub coworker_shared_time_cutoff_secs: i64,
    #[serde(default = "default_correspondence_cutoff")]
    pub last_correspondence_cutoff_secs: i64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

fn default_past_job_threshold() -> i64 {
    PAST_JOB_THRESHOLD_SECS
}

fn default_coworker_cutoff() -> i64 {
    COWORKER_SHARED_TIME_CUTOFF_SECS
}

fn default_correspondence_cutoff() -> i64 {
    LAST_CORRESPONDENCE_CUTOFF_SECS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            past_job_threshold_secs: default_past_job_threshold(),
            coworker_shared_time_cutoff_secs: default_coworker_cutoff(),
            last_correspondence_cutoff_secs: default_correspondence_cutoff(),
            batch_size: default_batch_size(),
            db_path: None,
        }
    }
}

impl StrengthConfig {
    /// Reject values that would make the job meaningless.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.batch_size == 0 {
            return Err(JobError::ConfigurationError(
                "batchSize must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("pastJobThresholdSecs", self.past_job_threshold_secs),
            ("coworkerSharedTimeCutoffSecs", self.coworker_shared_time_cutoff_secs),
            ("lastCorrespondenceCutoffSecs", self.last_correspondence_cutoff_secs),
        ] {
            if value < 0 {
                return Err(JobError::ConfigurationError(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Default config location: `~/.rapport/config.json`.
pub fn config_path() -> Result<PathBuf, JobError> {
    let home = dirs::home_dir().ok_or_else(|| {
        JobError::ConfigurationError("Could not find home directory".to_string())
    })?;
    Ok(home.join(".rapport").join("config.json"))
}

/// Load configuration from `~/.rapport/config.json`, falling back to
/// defaults when the file does not exist.
pub fn load_config() -> Result<StrengthConfig, JobError> {
    load_config_from(&config_path()?)
}

/// Load configuration from an explicit path. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<StrengthConfig, JobError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(StrengthConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        JobError::ConfigurationError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let config: StrengthConfig = serde_json::from_str(&content).map_err(|e| {
        JobError::ConfigurationError(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    config.validate()?;
    Ok(config)
}
