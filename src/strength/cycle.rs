//! One pass of the relationship-strength job.
//!
//! 1. Load the stalest contacts (batch size from config, 20 by default).
//! 2. Per contact: channel aggregates, own jobs, and the owner's jobs via the
//!    global identity matched on the owner's emails.
//! 3. Overlaps -> aged shared time, counts -> raw score, then adjustments.
//! 4. Collect every new score in memory and commit once at the end.

use chrono::Utc;

use super::adjust::adjust_strength;
use super::formula::relationship_points;
use super::overlap::{aged_shared_time, common_job_intervals};
use super::store::StrengthStore;
use crate::config::StrengthConfig;
use crate::db::{normalize_email, Channel, ContactSnapshot, DbError, ScoreUpdate, Tenure};
use crate::error::JobError;

/// Everything that went into one contact's new score.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthBreakdown {
    pub emails: u64,
    pub meetings: u64,
    pub interactions: u64,
    pub raw_score: f64,
    pub aged_shared_secs: i64,
    /// Latest correspondence on any channel, 0 if none.
    pub last_correspondence: i64,
    pub coworker_discounted: bool,
    pub stale_penalized: bool,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactScore {
    pub contact_id: String,
    pub previous_strength: f64,
    pub breakdown: StrengthBreakdown,
}

/// Result of a committed cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    /// The cycle's "now", also written as every contact's scoring time.
    pub started_at: i64,
    pub scored: Vec<ContactScore>,
}

/// Jobs of the user who owns the contact, found through the global identity
/// sharing one of the owner's emails. Empty when nothing matches.
fn owner_jobs<S: StrengthStore + ?Sized>(
    store: &S,
    snapshot: &ContactSnapshot,
) -> Result<Vec<Tenure>, DbError> {
    if snapshot.owner_emails.is_empty() {
        return Ok(Vec::new());
    }
    let emails: Vec<String> = snapshot
        .owner_emails
        .iter()
        .map(|e| normalize_email(e))
        .collect();
    match store.find_global_identity(&emails)? {
        Some(global_id) => store.global_tenures(&global_id),
        None => Ok(Vec::new()),
    }
}

/// Compute a contact's new strength without writing anything.
pub fn score_contact<S: StrengthStore + ?Sized>(
    store: &S,
    snapshot: &ContactSnapshot,
    config: &StrengthConfig,
    now: i64,
) -> Result<StrengthBreakdown, DbError> {
    let contact_id = snapshot.contact.id.as_str();
    let emails = store.channel_aggregate(contact_id, Channel::Email)?;
    let meetings = store.channel_aggregate(contact_id, Channel::Meeting)?;
    let interactions = store.channel_aggregate(contact_id, Channel::Interaction)?;

    let user_jobs = owner_jobs(store, snapshot)?;
    let intervals = common_job_intervals(&user_jobs, &snapshot.jobs, now);
    let aged_shared_secs = aged_shared_time(&intervals, now, config.past_job_threshold_secs);

    let raw_score = relationship_points(
        emails.count_or_zero(),
        meetings.count_or_zero(),
        interactions.count_or_zero(),
    );

    let last_correspondence = emails
        .most_recent_or_zero()
        .max(meetings.most_recent_or_zero())
        .max(interactions.most_recent_or_zero());

    let adjustment = adjust_strength(raw_score, aged_shared_secs, last_correspondence, now, config);

    Ok(StrengthBreakdown {
        emails: emails.count_or_zero(),
        meetings: meetings.count_or_zero(),
        interactions: interactions.count_or_zero(),
        raw_score,
        aged_shared_secs,
        last_correspondence,
        coworker_discounted: adjustment.coworker_discounted,
        stale_penalized: adjustment.stale_penalized,
        strength: adjustment.strength,
    })
}

/// Run one cycle with `now` as the cycle time.
///
/// Nothing is written until every selected contact has been scored; a storage
/// error anywhere before the commit leaves the store untouched.
pub fn run_cycle<S: StrengthStore + ?Sized>(
    store: &mut S,
    config: &StrengthConfig,
    now: i64,
) -> Result<CycleSummary, JobError> {
    log::info!("{} - Starting relationship strength cycle", now);

    let snapshots = store.stalest_contacts(config.batch_size).map_err(|e| {
        log::warn!("Failed to load stale contacts: {}", e);
        e
    })?;

    let mut scored = Vec::with_capacity(snapshots.len());
    let mut updates = Vec::with_capacity(snapshots.len());

    for snapshot in &snapshots {
        let breakdown = score_contact(&*store, snapshot, config, now).map_err(|e| {
            log::warn!("Failed to score contact {}: {}", snapshot.contact.id, e);
            e
        })?;

        log::debug!(
            "Contact {}: emails={} meetings={} interactions={} raw={:.3} shared={}s last={} -> {:.3}",
            snapshot.contact.id,
            breakdown.emails,
            breakdown.meetings,
            breakdown.interactions,
            breakdown.raw_score,
            breakdown.aged_shared_secs,
            breakdown.last_correspondence,
            breakdown.strength
        );

        updates.push(ScoreUpdate {
            contact_id: snapshot.contact.id.clone(),
            relationship_strength: breakdown.strength,
            relationship_strength_time: now,
        });
        scored.push(ContactScore {
            contact_id: snapshot.contact.id.clone(),
            previous_strength: snapshot.contact.relationship_strength,
            breakdown,
        });
    }

    store.commit_scores(&updates).map_err(|e| {
        log::warn!("Failed to commit {} relationship scores: {}", updates.len(), e);
        e
    })?;

    log::info!(
        "{} - Ending relationship strength cycle ({} contacts scored)",
        Utc::now().timestamp(),
        scored.len()
    );

    Ok(CycleSummary {
        started_at: now,
        scored,
    })
}

/// Run one cycle using the wall clock, read once at the start.
pub fn run_cycle_now<S: StrengthStore + ?Sized>(
    store: &mut S,
    config: &StrengthConfig,
) -> Result<CycleSummary, JobError> {
    run_cycle(store, config, Utc::now().timestamp())
}
