//! # Core Type Definitions
//!
//! This module contains all core types for the Fruitbench rating engine:
//! - Catalog entities (`Fruit`, `FruitTag`)
//! - Rating entities (`Criterion`, `Rating`, `Tier`, `RatedFruit`)
//! - View configuration (`SortColumn`, `SortDirection`, `SortConfig`, `FilterConfig`)
//! - The persisted aggregate (`AppState`)
//! - Error types (`FruitbenchError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where needed for deterministic ordering in `BTreeMap`
//! - Serialize with camelCase field names, matching the persisted wire format

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// FRUIT TAGS
// =============================================================================

/// Category label attached to catalog fruits.
///
/// A fruit may carry several tags (a banana is both `popular` and
/// `tropical`). The set is closed at the catalog layer; the persisted
/// filter configuration keeps tags as open strings instead (see
/// [`FilterConfig`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FruitTag {
    Popular,
    Berries,
    Tropical,
    Citrus,
    StoneFruit,
    Melons,
    Exotic,
    CulinaryVegetable,
    Dried,
    Orchard,
}

impl FruitTag {
    /// All tags, in display order.
    pub const ALL: [FruitTag; 10] = [
        FruitTag::Popular,
        FruitTag::Berries,
        FruitTag::Tropical,
        FruitTag::Citrus,
        FruitTag::StoneFruit,
        FruitTag::Melons,
        FruitTag::Exotic,
        FruitTag::CulinaryVegetable,
        FruitTag::Dried,
        FruitTag::Orchard,
    ];

    /// The wire form of the tag (kebab-case).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FruitTag::Popular => "popular",
            FruitTag::Berries => "berries",
            FruitTag::Tropical => "tropical",
            FruitTag::Citrus => "citrus",
            FruitTag::StoneFruit => "stone-fruit",
            FruitTag::Melons => "melons",
            FruitTag::Exotic => "exotic",
            FruitTag::CulinaryVegetable => "culinary-vegetable",
            FruitTag::Dried => "dried",
            FruitTag::Orchard => "orchard",
        }
    }

    /// Human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FruitTag::Popular => "Popular",
            FruitTag::Berries => "Berries",
            FruitTag::Tropical => "Tropical",
            FruitTag::Citrus => "Citrus",
            FruitTag::StoneFruit => "Stone Fruits",
            FruitTag::Melons => "Melons",
            FruitTag::Exotic => "Exotic",
            FruitTag::CulinaryVegetable => "Culinary Vegetables",
            FruitTag::Dried => "Dried",
            FruitTag::Orchard => "Orchard",
        }
    }

    /// One-line description of the category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            FruitTag::Popular => "Common fruits found in most supermarkets",
            FruitTag::Berries => "Small, juicy fruits with seeds",
            FruitTag::Tropical => "Fruits from tropical climates",
            FruitTag::Citrus => "Tangy fruits rich in vitamin C",
            FruitTag::StoneFruit => "Fruits with a hard pit or stone",
            FruitTag::Melons => "Large, sweet fruits with thick rind",
            FruitTag::Exotic => "Specialty or harder-to-find fruits",
            FruitTag::CulinaryVegetable => "Botanically fruits, culinarily vegetables",
            FruitTag::Dried => "Fruits commonly consumed dried",
            FruitTag::Orchard => "Tree fruits from orchards",
        }
    }
}

impl fmt::Display for FruitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FruitTag {
    type Err = FruitbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FruitTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| FruitbenchError::InvalidArgument(format!("unknown tag '{s}'")))
    }
}

// =============================================================================
// FRUIT
// =============================================================================

/// A catalog entity. Defined at build time, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fruit {
    /// Unique identifier (e.g. `apple-red`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub emoji: String,
    /// Category tags, non-empty.
    pub tags: Vec<FruitTag>,
    /// Alternate names for search (e.g. `kiwifruit` for Kiwi).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,
}

// =============================================================================
// CRITERIA & RATING
// =============================================================================

/// One of the four fixed scoring criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Flavor,
    Nourishment,
    Reliability,
    Practicality,
}

impl Criterion {
    /// All criteria, in scoring order.
    pub const ALL: [Criterion; 4] = [
        Criterion::Flavor,
        Criterion::Nourishment,
        Criterion::Reliability,
        Criterion::Practicality,
    ];

    /// The wire form of the criterion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Criterion::Flavor => "flavor",
            Criterion::Nourishment => "nourishment",
            Criterion::Reliability => "reliability",
            Criterion::Practicality => "practicality",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's scores for one fruit.
///
/// Each criterion is scored 0..=10; a score of 0 means "not yet rated" for
/// that criterion. Validation enforces the range on untrusted input; a
/// `Rating` constructed directly with out-of-range fields is summed as-is
/// (the sanitizer is the single gate, not the arithmetic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Foreign key into the fruit catalog.
    pub fruit_id: String,
    pub flavor: u8,
    pub nourishment: u8,
    pub reliability: u8,
    pub practicality: u8,
}

impl Rating {
    /// Maximum score per criterion.
    pub const MAX_SCORE: u8 = 10;

    /// Create an unscored rating (all criteria 0).
    #[must_use]
    pub fn new(fruit_id: impl Into<String>) -> Self {
        Self {
            fruit_id: fruit_id.into(),
            flavor: 0,
            nourishment: 0,
            reliability: 0,
            practicality: 0,
        }
    }

    /// Create a rating with all four scores.
    #[must_use]
    pub fn with_scores(
        fruit_id: impl Into<String>,
        flavor: u8,
        nourishment: u8,
        reliability: u8,
        practicality: u8,
    ) -> Self {
        Self {
            fruit_id: fruit_id.into(),
            flavor,
            nourishment,
            reliability,
            practicality,
        }
    }

    /// Read one criterion score.
    #[must_use]
    pub const fn score(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::Flavor => self.flavor,
            Criterion::Nourishment => self.nourishment,
            Criterion::Reliability => self.reliability,
            Criterion::Practicality => self.practicality,
        }
    }

    /// Set one criterion score. Scores are updated one criterion at a time
    /// by the user; the caller is responsible for range checks.
    pub fn set_score(&mut self, criterion: Criterion, value: u8) {
        match criterion {
            Criterion::Flavor => self.flavor = value,
            Criterion::Nourishment => self.nourishment = value,
            Criterion::Reliability => self.reliability = value,
            Criterion::Practicality => self.practicality = value,
        }
    }

    /// Check that every score is within 0..=[`Self::MAX_SCORE`].
    #[must_use]
    pub const fn in_range(&self) -> bool {
        self.flavor <= Self::MAX_SCORE
            && self.nourishment <= Self::MAX_SCORE
            && self.reliability <= Self::MAX_SCORE
            && self.practicality <= Self::MAX_SCORE
    }
}

// =============================================================================
// TIER
// =============================================================================

/// Tier classification derived from a rating total.
///
/// Declaration order is display order (S first), which also drives
/// `Ord` for deterministic `BTreeMap` grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    F,
}

impl Tier {
    /// All tiers, best first.
    pub const ALL: [Tier; 5] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::F];

    /// The wire form of the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::F => "F",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RATED FRUIT (derived view)
// =============================================================================

/// A fruit joined with its rating and the computed total and tier.
///
/// Derived, never persisted: always recomputed from `Fruit` + `Rating`.
/// Serialize-only: there is deliberately no way to deserialize one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedFruit {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub tags: Vec<FruitTag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,
    pub rating: Rating,
    /// Sum of the four criterion scores (0..=40 for validated ratings).
    pub total: u16,
    pub tier: Tier,
}

// =============================================================================
// SORT & FILTER CONFIGURATION
// =============================================================================

/// Column selector for the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Name,
    Flavor,
    Nourishment,
    Reliability,
    Practicality,
    Total,
}

impl SortColumn {
    /// All sortable columns.
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Name,
        SortColumn::Flavor,
        SortColumn::Nourishment,
        SortColumn::Reliability,
        SortColumn::Practicality,
        SortColumn::Total,
    ];

    /// The wire form of the column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Flavor => "flavor",
            SortColumn::Nourishment => "nourishment",
            SortColumn::Reliability => "reliability",
            SortColumn::Practicality => "practicality",
            SortColumn::Total => "total",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = FruitbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| FruitbenchError::InvalidArgument(format!("unknown sort column '{s}'")))
    }
}

/// Sort direction. `desc` negates the column comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The wire form of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = FruitbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(FruitbenchError::InvalidArgument(format!(
                "unknown sort direction '{other}' (expected 'asc' or 'desc')"
            ))),
        }
    }
}

/// How the results table is sorted. Defaults to total, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            column: SortColumn::Total,
            direction: SortDirection::Desc,
        }
    }
}

/// Persisted filter configuration.
///
/// Tags are stored as open strings: they are presentation metadata, not a
/// closed contract at this layer, so unknown tags survive persistence
/// untouched. The query layer matches them against [`FruitTag`], where an
/// unknown tag simply matches no fruit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    pub tags: Vec<String>,
    pub search_query: String,
    pub selected_fruit_ids: Vec<String>,
}

impl FilterConfig {
    /// The subset of `tags` that name known catalog categories.
    #[must_use]
    pub fn known_tags(&self) -> Vec<FruitTag> {
        self.tags
            .iter()
            .filter_map(|tag| tag.parse().ok())
            .collect()
    }
}

// =============================================================================
// APP STATE (persisted aggregate)
// =============================================================================

/// The full persisted session snapshot.
///
/// `ratings` uses a `BTreeMap` for deterministic iteration. Keys should
/// correspond to selected fruit ids, but reads must tolerate orphaned
/// ratings. Derived views resolve against the catalog and silently skip
/// what they cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    /// fruit id -> rating.
    pub ratings: BTreeMap<String, Rating>,
    /// Fruits the user has added to their bench, in selection order.
    pub selected_fruit_ids: Vec<String>,
    pub sort_config: SortConfig,
    pub filter_config: FilterConfig,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Fruitbench system.
///
/// - The core should never panic; all errors must be recoverable
/// - State loads degrade to defaults instead of failing (see the state module)
#[derive(Debug, Error)]
pub enum FruitbenchError {
    /// The referenced fruit id does not exist in the catalog.
    #[error("Unknown fruit id: {0}")]
    UnknownFruit(String),

    /// A caller-supplied argument is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_wire_form_is_kebab_case() {
        let json = serde_json::to_string(&FruitTag::StoneFruit).expect("serialize");
        assert_eq!(json, "\"stone-fruit\"");

        let tag: FruitTag = serde_json::from_str("\"culinary-vegetable\"").expect("deserialize");
        assert_eq!(tag, FruitTag::CulinaryVegetable);
    }

    #[test]
    fn tag_from_str_round_trips() {
        for tag in FruitTag::ALL {
            assert_eq!(tag.as_str().parse::<FruitTag>().expect("parse"), tag);
        }
        assert!("melon".parse::<FruitTag>().is_err());
    }

    #[test]
    fn tier_order_is_best_first() {
        assert!(Tier::S < Tier::A);
        assert!(Tier::A < Tier::B);
        assert!(Tier::B < Tier::C);
        assert!(Tier::C < Tier::F);
    }

    #[test]
    fn rating_score_access() {
        let mut rating = Rating::new("banana");
        assert_eq!(rating.score(Criterion::Flavor), 0);

        rating.set_score(Criterion::Flavor, 9);
        rating.set_score(Criterion::Practicality, 10);
        assert_eq!(rating.score(Criterion::Flavor), 9);
        assert_eq!(rating.score(Criterion::Practicality), 10);
        assert!(rating.in_range());

        rating.set_score(Criterion::Nourishment, 11);
        assert!(!rating.in_range());
    }

    #[test]
    fn rating_wire_form_is_camel_case() {
        let rating = Rating::with_scores("banana", 9, 8, 10, 10);
        let json = serde_json::to_string(&rating).expect("serialize");
        assert!(json.contains("\"fruitId\":\"banana\""));
        assert!(json.contains("\"flavor\":9"));
    }

    #[test]
    fn sort_config_default() {
        let config = SortConfig::default();
        assert_eq!(config.column, SortColumn::Total);
        assert_eq!(config.direction, SortDirection::Desc);
    }

    #[test]
    fn sort_column_from_str_rejects_unknown() {
        assert!("total".parse::<SortColumn>().is_ok());
        assert!("tier".parse::<SortColumn>().is_err());
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn filter_config_known_tags_skips_unknown() {
        let config = FilterConfig {
            tags: vec![
                "citrus".to_string(),
                "made-up".to_string(),
                "popular".to_string(),
            ],
            ..FilterConfig::default()
        };
        assert_eq!(
            config.known_tags(),
            vec![FruitTag::Citrus, FruitTag::Popular]
        );
    }

    #[test]
    fn app_state_default_round_trips() {
        let state = AppState::default();
        let json = serde_json::to_string(&state).expect("serialize");
        let restored: AppState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(state, restored);
    }
}
