//! Raw relationship score from communication counts (pure math, no DB).

const EMAIL_WEIGHT: f64 = 0.3;
const MEETING_WEIGHT: f64 = 3.0;
const INTERACTION_WEIGHT: f64 = 2.0;

/// Weighted activity at which the curve reaches ~7.07 (1/sqrt(2) of max).
const NORMALIZER: f64 = 40.0;

pub const MAX_SCORE: f64 = 10.0;

/// Map communication counts onto a saturating 0–10 scale.
///
/// `x = 0.3*emails + 3*meetings + 2*interactions`, `r = (x/40) / sqrt(1 + (x/40)^2)`,
/// score `= min(10, 10*r)`.
pub fn relationship_points(emails: u64, meetings: u64, interactions: u64) -> f64 {
    let weighted = EMAIL_WEIGHT * emails as f64
        + MEETING_WEIGHT * meetings as f64
        + INTERACTION_WEIGHT * interactions as f64;
    let normalized = weighted / NORMALIZER;
    let score = normalized / (1.0 + normalized * normalized).sqrt();
    (MAX_SCORE * score).min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_activity_scores_zero() {
        assert_eq!(relationship_points(0, 0, 0), 0.0);
    }

    #[test]
    fn test_ten_emails() {
        let score = relationship_points(10, 0, 0);
        let expected = 10.0 * (0.075 / (1.0_f64 + 0.075 * 0.075).sqrt());
        assert!((score - expected).abs() < 1e-12, "got {}", score);
        assert!((score - 0.748).abs() < 0.001, "expected ~0.748, got {}", score);
    }

    #[test]
    fn test_weighted_activity_of_forty_is_inverse_sqrt_two() {
        // 10 meetings + 5 interactions = 30 + 10 = 40
        let score = relationship_points(0, 10, 5);
        assert!(
            (score - 10.0 / 2.0_f64.sqrt()).abs() < 1e-9,
            "expected ~7.071, got {}",
            score
        );
    }

    #[test]
    fn test_bounded_by_max() {
        for (e, m, i) in [(1_000_000, 0, 0), (0, 1_000_000, 0), (u32::MAX as u64, 10_000, 10_000)] {
            let score = relationship_points(e, m, i);
            assert!(score <= MAX_SCORE, "({}, {}, {}) -> {}", e, m, i, score);
            assert!(score > 9.9, "large inputs should saturate, got {}", score);
        }
    }

    #[test]
    fn test_monotonic_in_each_argument() {
        let base = [(0u64, 0u64, 0u64), (3, 1, 2), (50, 4, 7)];
        for (e, m, i) in base {
            let s = relationship_points(e, m, i);
            assert!(relationship_points(e + 1, m, i) >= s);
            assert!(relationship_points(e, m + 1, i) >= s);
            assert!(relationship_points(e, m, i + 1) >= s);
        }
    }

    #[test]
    fn test_meetings_outweigh_emails() {
        assert!(relationship_points(0, 1, 0) > relationship_points(9, 0, 0));
        assert!(relationship_points(0, 0, 1) > relationship_points(6, 0, 0));
    }
}
