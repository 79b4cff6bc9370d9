//! # Fruit Catalog
//!
//! The built-in fruit database with tags for filtering and organization.
//!
//! Catalog entries are fixed at build time: fruits are never created,
//! mutated, or destroyed at runtime. Tags allow fruits to belong to
//! multiple categories (a banana is both `popular` and `tropical`).

use crate::{Fruit, FruitTag};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// The built-in catalog, initialized once.
pub fn builtin() -> &'static [Fruit] {
    static CATALOG: OnceLock<Vec<Fruit>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Find a fruit by id.
#[must_use]
pub fn find<'a>(fruits: &'a [Fruit], id: &str) -> Option<&'a Fruit> {
    fruits.iter().find(|fruit| fruit.id == id)
}

/// Resolve an ordered id list against the catalog.
///
/// Unknown ids are silently skipped; the output preserves the order of
/// `ids`, not the catalog order.
#[must_use]
pub fn fruits_by_ids(fruits: &[Fruit], ids: &[String]) -> Vec<Fruit> {
    ids.iter()
        .filter_map(|id| find(fruits, id).cloned())
        .collect()
}

/// All distinct tags used by the given fruits, in deterministic order.
#[must_use]
pub fn unique_tags(fruits: &[Fruit]) -> Vec<FruitTag> {
    let tags: BTreeSet<FruitTag> = fruits
        .iter()
        .flat_map(|fruit| fruit.tags.iter().copied())
        .collect();
    tags.into_iter().collect()
}

// =============================================================================
// CATALOG DATA
// =============================================================================

fn entry(id: &str, name: &str, emoji: &str, tags: &[FruitTag]) -> Fruit {
    Fruit {
        id: id.to_string(),
        name: name.to_string(),
        emoji: emoji.to_string(),
        tags: tags.to_vec(),
        search_terms: Vec::new(),
    }
}

fn entry_with_terms(
    id: &str,
    name: &str,
    emoji: &str,
    tags: &[FruitTag],
    terms: &[&str],
) -> Fruit {
    Fruit {
        search_terms: terms.iter().map(|term| (*term).to_string()).collect(),
        ..entry(id, name, emoji, tags)
    }
}

#[rustfmt::skip]
fn build_catalog() -> Vec<Fruit> {
    use FruitTag::{
        Berries, Citrus, CulinaryVegetable, Dried, Exotic, Melons, Orchard, Popular, StoneFruit,
        Tropical,
    };

    vec![
        // Popular supermarket fruits
        entry("banana", "Banana", "🍌", &[Popular, Tropical]),
        entry("apple-red", "Red Apple", "🍎", &[Popular, Orchard]),
        entry("apple-green", "Green Apple", "🍏", &[Popular, Orchard]),
        entry("orange", "Orange", "🍊", &[Popular, Citrus]),
        entry("strawberry", "Strawberry", "🍓", &[Popular, Berries]),
        entry("grape", "Grape", "🍇", &[Popular, Orchard]),
        entry("watermelon", "Watermelon", "🍉", &[Popular, Melons]),
        entry("blueberry", "Blueberry", "🫐", &[Popular, Berries]),
        entry("pear", "Pear", "🍐", &[Popular, Orchard]),

        // Berries
        entry_with_terms("raspberry", "Raspberry", "🫐", &[Berries], &["red berry"]),
        entry("blackberry", "Blackberry", "🫐", &[Berries]),
        entry("cranberry", "Cranberry", "🫐", &[Berries]),
        entry("gooseberry", "Gooseberry", "🫐", &[Berries, Exotic]),
        entry("elderberry", "Elderberry", "🫐", &[Berries, Exotic]),
        entry("mulberry", "Mulberry", "🫐", &[Berries]),
        entry("boysenberry", "Boysenberry", "🫐", &[Berries, Exotic]),

        // Stone fruits
        entry("peach", "Peach", "🍑", &[StoneFruit, Orchard]),
        entry("cherry", "Cherry", "🍒", &[Popular, StoneFruit, Orchard]),
        entry_with_terms("plum", "Plum", "🫐", &[StoneFruit, Orchard], &["purple plum"]),
        entry_with_terms("apricot", "Apricot", "🍑", &[StoneFruit, Orchard], &["dried apricot"]),
        entry("nectarine", "Nectarine", "🍑", &[StoneFruit, Orchard]),

        // Citrus
        entry("lemon", "Lemon", "🍋", &[Citrus, Popular]),
        entry_with_terms("lime", "Lime", "🍋", &[Citrus, Popular], &["key lime"]),
        entry("grapefruit", "Grapefruit", "🍊", &[Citrus]),
        entry_with_terms("tangerine", "Tangerine", "🍊", &[Citrus], &["mandarin"]),
        entry("clementine", "Clementine", "🍊", &[Citrus]),
        entry("blood-orange", "Blood Orange", "🍊", &[Citrus, Exotic]),
        entry("kumquat", "Kumquat", "🍊", &[Citrus, Exotic]),
        entry("pomelo", "Pomelo", "🍊", &[Citrus, Exotic]),
        entry("yuzu", "Yuzu", "🍋", &[Citrus, Exotic]),

        // Tropical
        entry("mango", "Mango", "🥭", &[Tropical, Popular]),
        entry("pineapple", "Pineapple", "🍍", &[Tropical, Popular]),
        entry_with_terms("papaya", "Papaya", "🫐", &[Tropical], &["pawpaw"]),
        entry("coconut", "Coconut", "🥥", &[Tropical]),
        entry_with_terms("kiwi", "Kiwi", "🥝", &[Tropical, Popular], &["kiwifruit"]),
        entry("passion-fruit", "Passion Fruit", "🫐", &[Tropical, Exotic]),
        entry("guava", "Guava", "🫐", &[Tropical, Exotic]),
        entry_with_terms("lychee", "Lychee", "🫐", &[Tropical, Exotic], &["litchi"]),
        entry("longan", "Longan", "🫐", &[Tropical, Exotic]),
        entry("plantain", "Plantain", "🍌", &[Tropical]),

        // Melons
        entry_with_terms("cantaloupe", "Cantaloupe", "🍈", &[Melons], &["rockmelon"]),
        entry("honeydew", "Honeydew", "🍈", &[Melons]),
        entry("watermelon-seedless", "Seedless Watermelon", "🍉", &[Melons]),

        // Exotic/specialty
        entry_with_terms("dragonfruit", "Dragon Fruit", "🐲", &[Exotic, Tropical], &["pitaya"]),
        entry("durian", "Durian", "🌰", &[Exotic, Tropical]),
        entry_with_terms("starfruit", "Star Fruit", "⭐", &[Exotic, Tropical], &["carambola"]),
        entry("rambutan", "Rambutan", "🫐", &[Exotic, Tropical]),
        entry("mangosteen", "Mangosteen", "🫐", &[Exotic, Tropical]),
        entry("jackfruit", "Jackfruit", "🫐", &[Exotic, Tropical]),
        entry("persimmon", "Persimmon", "🍊", &[Exotic, Orchard]),
        entry("pomegranate", "Pomegranate", "🫐", &[Exotic]),
        entry("fig", "Fig", "🫐", &[Exotic, Orchard]),
        entry_with_terms("date", "Date", "🫐", &[Exotic, Dried], &["medjool date"]),
        entry_with_terms("acai", "Acai", "🫐", &[Exotic, Berries], &["acai berry"]),

        // Culinary vegetables (botanically fruits)
        entry("tomato", "Tomato", "🍅", &[CulinaryVegetable, Popular]),
        entry("avocado", "Avocado", "🥑", &[CulinaryVegetable, Popular, Tropical]),
        entry("cucumber", "Cucumber", "🥒", &[CulinaryVegetable, Popular]),
        entry("bell-pepper", "Bell Pepper", "🫑", &[CulinaryVegetable]),
        entry("eggplant", "Eggplant", "🍆", &[CulinaryVegetable]),
        entry("squash", "Squash", "🫐", &[CulinaryVegetable]),
        entry("pumpkin", "Pumpkin", "🎃", &[CulinaryVegetable]),
        entry_with_terms("zucchini", "Zucchini", "🥒", &[CulinaryVegetable], &["courgette"]),
        entry("olive", "Olive", "🫒", &[CulinaryVegetable, Exotic]),

        // Additional popular fruits
        entry("cherry-tomato", "Cherry Tomato", "🍅", &[CulinaryVegetable, Popular]),
        entry("grape-tomato", "Grape Tomato", "🍅", &[CulinaryVegetable]),
        entry("blackcurrant", "Blackcurrant", "🫐", &[Berries, Exotic]),
        entry("redcurrant", "Redcurrant", "🫐", &[Berries, Exotic]),
        entry("quince", "Quince", "🍐", &[Orchard, Exotic]),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
