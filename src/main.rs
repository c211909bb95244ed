//! Run one relationship-strength cycle against the local contact store.
//!
//! Usage: `rapport [--db <path>]`. Logging follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use rapport_lib::config::load_config;
use rapport_lib::db::ContactDb;
use rapport_lib::error::JobError;
use rapport_lib::strength::run_cycle_now;

fn parse_db_arg() -> Result<Option<PathBuf>, JobError> {
    let mut args = std::env::args().skip(1);
    let mut db_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let value = args.next().ok_or_else(|| {
                    JobError::ConfigurationError("--db requires a path".to_string())
                })?;
                db_path = Some(PathBuf::from(value));
            }
            other => {
                return Err(JobError::ConfigurationError(format!(
                    "Unknown argument: {}",
                    other
                )))
            }
        }
    }
    Ok(db_path)
}

fn run() -> Result<usize, JobError> {
    let db_arg = parse_db_arg()?;
    let config = load_config()?;
    let db_path = db_arg.or_else(|| config.db_path.clone());
    let mut db = ContactDb::open_or_default(db_path.as_deref())?;
    let summary = run_cycle_now(&mut db, &config)?;
    Ok(summary.scored.len())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(count) => {
            log::debug!("Scored {} contacts", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Relationship strength cycle failed: {}", e);
            log::error!("{}", e.recovery_suggestion());
            if e.is_retryable() {
                // EX_TEMPFAIL
                ExitCode::from(75)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
