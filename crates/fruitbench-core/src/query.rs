//! # Query Engine
//!
//! Filter, sort, and grouping operations over fruit and rated-fruit
//! collections.
//!
//! - Every operation is pure: inputs are never mutated, outputs are new
//!   collections
//! - Tag filtering is disjunctive (OR); the tag filter and the search
//!   filter combine conjunctively (AND)
//! - Sorting is stable

use crate::rating::to_rated_fruit;
use crate::{Fruit, FruitTag, RatedFruit, Rating, SortColumn, SortDirection, Tier};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// In-memory filter criteria for catalog queries.
///
/// Distinct from the persisted [`crate::FilterConfig`]: here tags are the
/// closed catalog enum, resolved by the caller.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub tags: Vec<FruitTag>,
    pub search_query: String,
}

/// Filter fruits by tags with OR semantics.
///
/// A fruit passes if it carries at least one of the requested tags.
/// An empty request is the identity filter.
#[must_use]
pub fn filter_by_tags(fruits: &[Fruit], tags: &[FruitTag]) -> Vec<Fruit> {
    if tags.is_empty() {
        return fruits.to_vec();
    }
    fruits
        .iter()
        .filter(|fruit| fruit.tags.iter().any(|tag| tags.contains(tag)))
        .cloned()
        .collect()
}

/// Filter fruits by a case-insensitive substring search over the name and
/// the alternate search terms. A blank query is the identity filter.
#[must_use]
pub fn filter_by_search(fruits: &[Fruit], query: &str) -> Vec<Fruit> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return fruits.to_vec();
    }

    fruits
        .iter()
        .filter(|fruit| {
            fruit.name.to_lowercase().contains(&normalized)
                || fruit
                    .search_terms
                    .iter()
                    .any(|term| term.to_lowercase().contains(&normalized))
        })
        .cloned()
        .collect()
}

/// Apply the tag filter, then the search filter.
#[must_use]
pub fn filter_fruits(fruits: &[Fruit], options: &FilterOptions) -> Vec<Fruit> {
    let by_tags = filter_by_tags(fruits, &options.tags);
    filter_by_search(&by_tags, &options.search_query)
}

/// Sort rated fruits by a column and direction.
///
/// The sort is stable and returns a new vector; the input is untouched.
/// `desc` reverses the comparator, not the output, so equal-key elements
/// keep their input order either way. Name comparison is case-insensitive
/// with the raw name as deterministic tie-break.
#[must_use]
pub fn sort_rated_fruits(
    fruits: &[RatedFruit],
    column: SortColumn,
    direction: SortDirection,
) -> Vec<RatedFruit> {
    let mut sorted = fruits.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by_column(a, b, column);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare_by_column(a: &RatedFruit, b: &RatedFruit, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortColumn::Flavor => a.rating.flavor.cmp(&b.rating.flavor),
        SortColumn::Nourishment => a.rating.nourishment.cmp(&b.rating.nourishment),
        SortColumn::Reliability => a.rating.reliability.cmp(&b.rating.reliability),
        SortColumn::Practicality => a.rating.practicality.cmp(&b.rating.practicality),
        SortColumn::Total => a.total.cmp(&b.total),
    }
}

/// Partition rated fruits into the five tier buckets.
///
/// Every bucket is present in the result: empty tiers map to empty
/// vectors, not absent keys. Relative input order is preserved within
/// each bucket.
#[must_use]
pub fn group_by_tier(fruits: &[RatedFruit]) -> BTreeMap<Tier, Vec<RatedFruit>> {
    let mut groups: BTreeMap<Tier, Vec<RatedFruit>> =
        Tier::ALL.into_iter().map(|tier| (tier, Vec::new())).collect();
    for fruit in fruits {
        groups.entry(fruit.tier).or_default().push(fruit.clone());
    }
    groups
}

/// Join fruits with their ratings.
///
/// Produces one [`RatedFruit`] per fruit that has a rating; fruits without
/// one are silently excluded, as are ratings whose fruit id resolves to
/// nothing in `fruits`.
#[must_use]
pub fn rated_fruits(fruits: &[Fruit], ratings: &BTreeMap<String, Rating>) -> Vec<RatedFruit> {
    fruits
        .iter()
        .filter_map(|fruit| {
            ratings
                .get(&fruit.id)
                .and_then(|rating| to_rated_fruit(fruit, rating))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
