//! Coworker discount and stale-correspondence penalty applied to the raw score.

use crate::config::StrengthConfig;

/// Multiplier once the aged shared tenure reaches the coworker cutoff.
pub const COWORKER_DISCOUNT: f64 = 0.8;

/// Flat deduction when the last correspondence is older than the cutoff.
pub const STALE_PENALTY: f64 = 1.5;

/// No adjusted score goes below this.
pub const SCORE_FLOOR: f64 = 1.0;

/// Outcome of the adjustment rules, kept for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub strength: f64,
    pub coworker_discounted: bool,
    pub stale_penalized: bool,
}

/// Apply, in order: the multiplicative coworker discount, the flat stale
/// penalty, then the floor.
///
/// `last_correspondence` is 0 for a contact with no recorded correspondence,
/// which makes the stale penalty apply.
pub fn adjust_strength(
    raw_score: f64,
    aged_shared_secs: i64,
    last_correspondence: i64,
    now: i64,
    config: &StrengthConfig,
) -> Adjustment {
    let mut strength = raw_score;

    let coworker_discounted = aged_shared_secs >= config.coworker_shared_time_cutoff_secs;
    if coworker_discounted {
        strength *= COWORKER_DISCOUNT;
    }

    let stale_penalized = now - last_correspondence >= config.last_correspondence_cutoff_secs;
    if stale_penalized {
        strength -= STALE_PENALTY;
    }

    Adjustment {
        strength: strength.max(SCORE_FLOOR),
        coworker_discounted,
        stale_penalized,
    }
}
