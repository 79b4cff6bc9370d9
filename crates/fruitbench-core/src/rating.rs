//! # Rating Model
//!
//! Pure scoring and tiering functions.
//!
//! - Totals are integer sums of the four criterion scores
//! - Tiers are a deterministic threshold classification over the total
//! - No side effects, no clamping: validation is the single range gate

use crate::{Fruit, RatedFruit, Rating, Tier};

/// Maximum total for a validated rating (four criteria at 10).
pub const MAX_TOTAL: u16 = 40;

/// Tier thresholds over the 40-point total.
///
/// S: 36-40 (90%+)
/// A: 32-35 (80-89%)
/// B: 28-31 (70-79%)
/// C: 20-27 (50-69%)
/// F: 0-19 (<50%)
pub const S_THRESHOLD: u16 = 36;
pub const A_THRESHOLD: u16 = 32;
pub const B_THRESHOLD: u16 = 28;
pub const C_THRESHOLD: u16 = 20;

/// Sum the four criterion scores.
///
/// No clamping is performed: fields are assumed validated into 0..=10, and
/// a rating constructed directly with larger fields simply sums higher.
#[must_use]
pub fn calculate_total(rating: &Rating) -> u16 {
    u16::from(rating.flavor)
        + u16::from(rating.nourishment)
        + u16::from(rating.reliability)
        + u16::from(rating.practicality)
}

/// Classify a total into a tier.
///
/// The bins are contiguous and non-overlapping; everything below
/// [`C_THRESHOLD`] is F, so the whole `u16` range is covered.
#[must_use]
pub const fn calculate_tier(total: u16) -> Tier {
    if total >= S_THRESHOLD {
        Tier::S
    } else if total >= A_THRESHOLD {
        Tier::A
    } else if total >= B_THRESHOLD {
        Tier::B
    } else if total >= C_THRESHOLD {
        Tier::C
    } else {
        Tier::F
    }
}

/// Merge a fruit with its rating into a [`RatedFruit`].
///
/// Returns `None` when the rating does not reference this fruit; resolving
/// which rating belongs to which fruit is the caller's job (see
/// [`crate::query::rated_fruits`]).
#[must_use]
pub fn to_rated_fruit(fruit: &Fruit, rating: &Rating) -> Option<RatedFruit> {
    if rating.fruit_id != fruit.id {
        return None;
    }

    let total = calculate_total(rating);
    Some(RatedFruit {
        id: fruit.id.clone(),
        name: fruit.name.clone(),
        emoji: fruit.emoji.clone(),
        tags: fruit.tags.clone(),
        search_terms: fruit.search_terms.clone(),
        rating: rating.clone(),
        total,
        tier: calculate_tier(total),
    })
}

/// Check whether a rating exists and every criterion has been scored.
///
/// A score of exactly 0 counts as "not yet rated" for that criterion;
/// zero is indistinguishable from unset by convention.
#[must_use]
pub fn is_fully_rated(rating: Option<&Rating>) -> bool {
    rating.is_some_and(|r| {
        r.flavor > 0 && r.nourishment > 0 && r.reliability > 0 && r.practicality > 0
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn total_is_sum_of_criteria() {
        let rating = Rating::with_scores("banana", 9, 8, 10, 10);
        assert_eq!(calculate_total(&rating), 37);
    }

    #[test]
    fn tier_boundaries() {
        let cases = [
            (0, Tier::F),
            (19, Tier::F),
            (20, Tier::C),
            (27, Tier::C),
            (28, Tier::B),
            (31, Tier::B),
            (32, Tier::A),
            (35, Tier::A),
            (36, Tier::S),
            (40, Tier::S),
        ];
        for (total, expected) in cases {
            assert_eq!(calculate_tier(total), expected, "total {total}");
        }
    }

    #[test]
    fn out_of_range_scores_sum_without_clamping() {
        let rating = Rating::with_scores("banana", 200, 200, 200, 200);
        assert_eq!(calculate_total(&rating), 800);
        assert_eq!(calculate_tier(800), Tier::S);
    }

    #[test]
    fn to_rated_fruit_merges_identity_and_scores() {
        let banana = catalog::find(catalog::builtin(), "banana").expect("banana");
        let rating = Rating::with_scores("banana", 9, 8, 10, 10);

        let rated = to_rated_fruit(banana, &rating).expect("ids match");
        assert_eq!(rated.name, "Banana");
        assert_eq!(rated.total, 37);
        assert_eq!(rated.tier, Tier::S);
    }

    #[test]
    fn to_rated_fruit_rejects_mismatched_id() {
        let banana = catalog::find(catalog::builtin(), "banana").expect("banana");
        let rating = Rating::with_scores("pear", 5, 5, 5, 5);
        assert!(to_rated_fruit(banana, &rating).is_none());
    }

    #[test]
    fn fully_rated_requires_every_criterion_above_zero() {
        assert!(!is_fully_rated(None));

        let partial = Rating::with_scores("banana", 9, 8, 0, 10);
        assert!(!is_fully_rated(Some(&partial)));

        let complete = Rating::with_scores("banana", 1, 1, 1, 1);
        assert!(is_fully_rated(Some(&complete)));
    }
}
