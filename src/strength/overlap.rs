//! Shared-employment detection between the user's and a contact's job history.
//!
//! Tenure bounds left open in storage are resolved to `now`, so a current job
//! runs up to the present and a job with no known start begins at the present.

use crate::db::Tenure;

/// A span both people spent at the same employer, epoch seconds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapInterval {
    pub start: i64,
    pub end: i64,
}

impl OverlapInterval {
    /// Length in seconds. Inverted intervals (from malformed tenures) count as 0.
    pub fn duration(&self) -> i64 {
        (self.end - self.start).max(0)
    }
}

fn effective_bounds(job: &Tenure, now: i64) -> (i64, i64) {
    (job.start_time.unwrap_or(now), job.end_time.unwrap_or(now))
}

/// Pairwise intersections of every user tenure with every contact tenure at
/// the same employer (exact name match).
///
/// No merging or de-duplication: two pairs covering the same period yield two
/// intervals.
pub fn common_job_intervals(
    user_jobs: &[Tenure],
    contact_jobs: &[Tenure],
    now: i64,
) -> Vec<OverlapInterval> {
    let mut intervals = Vec::new();

    for user_job in user_jobs {
        let (user_start, user_end) = effective_bounds(user_job, now);
        for contact_job in contact_jobs {
            if user_job.company != contact_job.company {
                continue;
            }
            let (contact_start, contact_end) = effective_bounds(contact_job, now);

            // Not disjoint: neither starts after the other ends.
            if contact_start <= user_end && user_start <= contact_end {
                intervals.push(OverlapInterval {
                    start: user_start.max(contact_start),
                    end: user_end.min(contact_end),
                });
            }
        }
    }

    intervals
}

/// Total shared time from overlaps that ended more than `past_job_threshold`
/// seconds before `now`. Recent and ongoing overlaps contribute nothing.
pub fn aged_shared_time(intervals: &[OverlapInterval], now: i64, past_job_threshold: i64) -> i64 {
    intervals
        .iter()
        .filter(|interval| now - interval.end > past_job_threshold)
        .map(OverlapInterval::duration)
        .sum()
}
