//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command opens the state store fresh, performs one operation, and
//! lets the store drop, per the single-writer assumption the persistence
//! layer is built on.

use chrono::Utc;
use fruitbench_core::{
    Criterion, FilterConfig, FilterOptions, Fruit, FruitTag, FruitbenchError, Rating, SharePayload,
    SortColumn, SortConfig, SortDirection, StatePatch, StateStore, Tier, catalog, decode_share,
    extract_data_param, group_by_tier, is_fully_rated, rated_fruits, share_url, sort_rated_fruits,
    strip_data_param,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for session imports (16 MB).
///
/// A session is a few kilobytes of JSON; anything near this limit is not a
/// fruitbench export.
const MAX_IMPORT_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), FruitbenchError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| FruitbenchError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(FruitbenchError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

// =============================================================================
// STORE & CATALOG HELPERS
// =============================================================================

/// Open the state store for the selected backend.
fn open_store(db_path: &Path, backend: &str) -> Result<StateStore, FruitbenchError> {
    match backend {
        "memory" => Ok(StateStore::new()),
        "redb" => StateStore::with_redb(db_path),
        other => Err(FruitbenchError::InvalidArgument(format!(
            "unknown backend '{other}' (expected 'redb' or 'memory')"
        ))),
    }
}

/// Resolve a fruit id against the catalog.
fn require_fruit(fruit_id: &str) -> Result<&'static Fruit, FruitbenchError> {
    catalog::find(catalog::builtin(), fruit_id)
        .ok_or_else(|| FruitbenchError::UnknownFruit(fruit_id.to_string()))
}

/// Parse a comma-separated tag list.
fn parse_tags(tags: &str) -> Result<Vec<FruitTag>, FruitbenchError> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::parse)
        .collect()
}

/// Check a criterion score against the 0..=10 range.
fn validate_score(criterion: Criterion, score: u8) -> Result<u8, FruitbenchError> {
    if score > Rating::MAX_SCORE {
        return Err(FruitbenchError::InvalidArgument(format!(
            "{criterion} score {score} is out of range (0-{})",
            Rating::MAX_SCORE
        )));
    }
    Ok(score)
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show bench status.
pub fn cmd_status(db_path: &Path, backend: &str, json_mode: bool) -> Result<(), FruitbenchError> {
    let store = open_store(db_path, backend)?;
    let state = store.load();

    let fully_rated = state
        .ratings
        .values()
        .filter(|rating| is_fully_rated(Some(rating)))
        .count();

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": backend,
            "catalog_size": catalog::builtin().len(),
            "selected_count": state.selected_fruit_ids.len(),
            "rated_count": state.ratings.len(),
            "fully_rated_count": fully_rated,
            "sort_column": state.sort_config.column.as_str(),
            "sort_direction": state.sort_config.direction.as_str(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Fruitbench Status");
    println!("=================");
    println!("Database: {:?}", db_path);
    println!("Backend:  {}", backend);
    println!();
    println!("Catalog:      {} fruits", catalog::builtin().len());
    println!("Selected:     {}", state.selected_fruit_ids.len());
    println!("Rated:        {}", state.ratings.len());
    println!("Fully rated:  {}", fully_rated);
    println!(
        "Sort:         {} ({})",
        state.sort_config.column, state.sort_config.direction
    );

    Ok(())
}

// =============================================================================
// CATALOG COMMANDS
// =============================================================================

/// Browse the catalog with optional tag and search filters.
///
/// Flags that are given are persisted as the session's filter config;
/// flags that are omitted fall back to the persisted config, so repeated
/// browses keep the previous view.
pub fn cmd_catalog(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    tags: Option<&str>,
    search: Option<&str>,
) -> Result<(), FruitbenchError> {
    let mut store = open_store(db_path, backend)?;
    let stored = store.load().filter_config;

    let options = FilterOptions {
        tags: match tags {
            Some(tags) => parse_tags(tags)?,
            None => stored.known_tags(),
        },
        search_query: search.map_or(stored.search_query.clone(), str::to_string),
    };

    if tags.is_some() || search.is_some() {
        let filter_config = FilterConfig {
            tags: options
                .tags
                .iter()
                .map(|tag| tag.as_str().to_string())
                .collect(),
            search_query: options.search_query.clone(),
            selected_fruit_ids: Vec::new(),
        };
        store.save(StatePatch {
            filter_config: Some(filter_config),
            ..StatePatch::default()
        });
    }

    let fruits = fruitbench_core::filter_fruits(catalog::builtin(), &options);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&fruits).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Fruitbench Catalog ({} fruits)", fruits.len());
    println!("==============================");
    for fruit in &fruits {
        let tags: Vec<&str> = fruit.tags.iter().map(|tag| tag.as_str()).collect();
        println!(
            "  {} {:<20} {:<20} [{}]",
            fruit.emoji,
            fruit.name,
            fruit.id,
            tags.join(", ")
        );
    }

    Ok(())
}

/// List tag categories with fruit counts.
pub fn cmd_tags(json_mode: bool) -> Result<(), FruitbenchError> {
    let fruits = catalog::builtin();

    if json_mode {
        let output: Vec<_> = FruitTag::ALL
            .iter()
            .map(|tag| {
                let count = fruits.iter().filter(|fruit| fruit.tags.contains(tag)).count();
                serde_json::json!({
                    "tag": tag.as_str(),
                    "label": tag.label(),
                    "description": tag.description(),
                    "fruit_count": count,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Fruitbench Tags");
    println!("===============");
    for tag in FruitTag::ALL {
        let count = fruits.iter().filter(|fruit| fruit.tags.contains(&tag)).count();
        println!(
            "  {:<20} ({:>2} fruits)  {}",
            tag.label(),
            count,
            tag.description()
        );
    }

    Ok(())
}

// =============================================================================
// SELECTION COMMANDS
// =============================================================================

/// Add a fruit to the selection.
pub fn cmd_add(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    fruit_id: &str,
) -> Result<(), FruitbenchError> {
    let fruit = require_fruit(fruit_id)?;
    let mut store = open_store(db_path, backend)?;
    store.add_selected_fruit(fruit_id);
    let selected_count = store.load().selected_fruit_ids.len();

    if json_mode {
        let output = serde_json::json!({
            "added": fruit_id,
            "selected_count": selected_count,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Added {} {} to the bench ({} selected)",
        fruit.emoji, fruit.name, selected_count
    );
    Ok(())
}

/// Remove a fruit from the selection, deleting its rating with it.
///
/// Intentionally does not resolve the id against the catalog, so stale ids
/// can still be removed from old sessions.
pub fn cmd_remove(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    fruit_id: &str,
) -> Result<(), FruitbenchError> {
    let mut store = open_store(db_path, backend)?;
    store.remove_selected_fruit(fruit_id);
    let selected_count = store.load().selected_fruit_ids.len();

    if json_mode {
        let output = serde_json::json!({
            "removed": fruit_id,
            "selected_count": selected_count,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Removed {} from the bench ({} selected)", fruit_id, selected_count);
    Ok(())
}

/// List the current selection with rating progress.
pub fn cmd_selected(db_path: &Path, backend: &str, json_mode: bool) -> Result<(), FruitbenchError> {
    let store = open_store(db_path, backend)?;
    let state = store.load();
    let fruits = catalog::fruits_by_ids(catalog::builtin(), &state.selected_fruit_ids);

    if json_mode {
        let output: Vec<_> = fruits
            .iter()
            .map(|fruit| {
                let rating = state.ratings.get(&fruit.id);
                serde_json::json!({
                    "id": fruit.id,
                    "name": fruit.name,
                    "rated": rating.is_some(),
                    "fully_rated": is_fully_rated(rating),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Selected Fruits ({})", fruits.len());
    println!("===================");
    for fruit in &fruits {
        let rating = state.ratings.get(&fruit.id);
        let progress = if is_fully_rated(rating) {
            "fully rated"
        } else if rating.is_some() {
            "partially rated"
        } else {
            "unrated"
        };
        println!("  {} {:<20} {}", fruit.emoji, fruit.name, progress);
    }

    Ok(())
}

// =============================================================================
// RATING COMMANDS
// =============================================================================

/// Rate a fruit, merging the given criteria into any existing rating.
pub fn cmd_rate(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    fruit_id: &str,
    flavor: Option<u8>,
    nourishment: Option<u8>,
    reliability: Option<u8>,
    practicality: Option<u8>,
) -> Result<(), FruitbenchError> {
    let fruit = require_fruit(fruit_id)?;
    if flavor.is_none() && nourishment.is_none() && reliability.is_none() && practicality.is_none()
    {
        return Err(FruitbenchError::InvalidArgument(
            "provide at least one criterion (--flavor, --nourishment, --reliability, --practicality)"
                .to_string(),
        ));
    }

    let mut store = open_store(db_path, backend)?;
    let state = store.load();
    let mut rating = state
        .ratings
        .get(fruit_id)
        .cloned()
        .unwrap_or_else(|| Rating::new(fruit_id));

    let updates = [
        (Criterion::Flavor, flavor),
        (Criterion::Nourishment, nourishment),
        (Criterion::Reliability, reliability),
        (Criterion::Practicality, practicality),
    ];
    for (criterion, score) in updates {
        if let Some(score) = score {
            rating.set_score(criterion, validate_score(criterion, score)?);
        }
    }

    let total = fruitbench_core::calculate_total(&rating);
    let tier = fruitbench_core::calculate_tier(total);
    let complete = is_fully_rated(Some(&rating));
    store.save_rating(rating.clone());

    if json_mode {
        let output = serde_json::json!({
            "fruit_id": fruit_id,
            "rating": rating,
            "total": total,
            "tier": tier.as_str(),
            "fully_rated": complete,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{} {} scored {}/{} (Tier {})",
        fruit.emoji,
        fruit.name,
        total,
        fruitbench_core::MAX_TOTAL,
        tier
    );
    if !complete {
        println!("(some criteria are still unscored)");
    }
    Ok(())
}

/// Delete a fruit's rating.
pub fn cmd_unrate(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    fruit_id: &str,
) -> Result<(), FruitbenchError> {
    let mut store = open_store(db_path, backend)?;
    store.delete_rating(fruit_id);

    if json_mode {
        let output = serde_json::json!({ "unrated": fruit_id });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Deleted rating for {}", fruit_id);
    Ok(())
}

// =============================================================================
// TABLE COMMAND
// =============================================================================

/// Show the tiered results table for the current selection.
pub fn cmd_table(db_path: &Path, backend: &str, json_mode: bool) -> Result<(), FruitbenchError> {
    let store = open_store(db_path, backend)?;
    let state = store.load();

    let selected = catalog::fruits_by_ids(catalog::builtin(), &state.selected_fruit_ids);
    let rated = rated_fruits(&selected, &state.ratings);
    let sorted = sort_rated_fruits(&rated, state.sort_config.column, state.sort_config.direction);
    let groups = group_by_tier(&sorted);

    if json_mode {
        let output = serde_json::json!({
            "sort_column": state.sort_config.column.as_str(),
            "sort_direction": state.sort_config.direction.as_str(),
            "results": sorted,
            "tiers": groups,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Fruitbench Results");
    println!("==================");
    println!(
        "Sort: {} ({}) | {} of {} selected fruits rated",
        state.sort_config.column,
        state.sort_config.direction,
        sorted.len(),
        selected.len()
    );

    for tier in Tier::ALL {
        let bucket = groups.get(&tier).map(Vec::as_slice).unwrap_or_default();
        if bucket.is_empty() {
            continue;
        }

        println!();
        println!("Tier {}", tier);
        println!("------");
        for fruit in bucket {
            let marker = if is_fully_rated(Some(&fruit.rating)) {
                ' '
            } else {
                '*'
            };
            println!(
                "  {} {:<20} F {:>2}  N {:>2}  R {:>2}  P {:>2}  | {:>2}/{}{}",
                fruit.emoji,
                fruit.name,
                fruit.rating.flavor,
                fruit.rating.nourishment,
                fruit.rating.reliability,
                fruit.rating.practicality,
                fruit.total,
                fruitbench_core::MAX_TOTAL,
                marker
            );
        }
    }

    if sorted
        .iter()
        .any(|fruit| !is_fully_rated(Some(&fruit.rating)))
    {
        println!();
        println!("* some criteria are still unscored");
    }

    Ok(())
}

// =============================================================================
// SORT COMMAND
// =============================================================================

/// Persist the sort configuration.
pub fn cmd_sort(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    column: &str,
    direction: &str,
) -> Result<(), FruitbenchError> {
    let sort_config = SortConfig {
        column: column.parse::<SortColumn>()?,
        direction: direction.parse::<SortDirection>()?,
    };

    let mut store = open_store(db_path, backend)?;
    store.save_sort_config(sort_config);

    if json_mode {
        let output = serde_json::json!({
            "sort_column": sort_config.column.as_str(),
            "sort_direction": sort_config.direction.as_str(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Sorting by {} ({})",
        sort_config.column, sort_config.direction
    );
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// The export file shape: the shareable slice plus a timestamp.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportFile {
    ratings: BTreeMap<String, Rating>,
    selected_fruit_ids: Vec<String>,
    exported_at: String,
}

/// Export the session to a JSON file.
pub fn cmd_export(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    output: Option<&Path>,
) -> Result<(), FruitbenchError> {
    let store = open_store(db_path, backend)?;
    let state = store.load();

    let file = ExportFile {
        ratings: state.ratings,
        selected_fruit_ids: state.selected_fruit_ids,
        exported_at: Utc::now().to_rfc3339(),
    };
    let contents = serde_json::to_string_pretty(&file)
        .map_err(|e| FruitbenchError::SerializationError(e.to_string()))?;

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(format!("fruitbench-{}.json", Utc::now().timestamp_millis()))
    });
    std::fs::write(&path, contents).map_err(|e| FruitbenchError::IoError(e.to_string()))?;

    if json_mode {
        let output = serde_json::json!({
            "exported_to": path.to_string_lossy(),
            "rating_count": file.ratings.len(),
            "selected_count": file.selected_fruit_ids.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Exported {} ratings and {} selected fruits to {:?}",
        file.ratings.len(),
        file.selected_fruit_ids.len(),
        path
    );
    Ok(())
}

/// Import a previously exported session file.
pub fn cmd_import(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    input: &Path,
) -> Result<(), FruitbenchError> {
    validate_file_size(input, MAX_IMPORT_FILE_SIZE)?;
    let contents =
        std::fs::read_to_string(input).map_err(|e| FruitbenchError::IoError(e.to_string()))?;

    let mut store = open_store(db_path, backend)?;
    if !store.import_json(&contents) {
        return Err(FruitbenchError::DeserializationError(format!(
            "{:?} is not a valid fruitbench session",
            input
        )));
    }

    let state = store.load();
    if json_mode {
        let output = serde_json::json!({
            "imported_from": input.to_string_lossy(),
            "rating_count": state.ratings.len(),
            "selected_count": state.selected_fruit_ids.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Imported {} ratings and {} selected fruits from {:?}",
        state.ratings.len(),
        state.selected_fruit_ids.len(),
        input
    );
    Ok(())
}

// =============================================================================
// SHARE COMMANDS
// =============================================================================

/// Print a shareable link for the current session.
pub fn cmd_share(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    base: &str,
) -> Result<(), FruitbenchError> {
    let store = open_store(db_path, backend)?;
    let payload = SharePayload::from_state(&store.load());
    let url = share_url(base, &payload)?;

    if json_mode {
        let output = serde_json::json!({
            "url": url,
            "rating_count": payload.ratings.len(),
            "selected_count": payload.selected_fruit_ids.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Share this bench:");
    println!("{}", url);
    Ok(())
}

/// Consume a share link.
///
/// A URL carrying a `data` parameter takes priority over the persisted
/// record: on successful decode the payload replaces the stored ratings
/// and selection, and the cleaned URL is printed. Decode failure is
/// logged and falls through to the saved state, never a hard error.
pub fn cmd_open(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    url: &str,
) -> Result<(), FruitbenchError> {
    let Some(encoded) = extract_data_param(url) else {
        println!("No share data in URL; keeping saved state.");
        return Ok(());
    };

    let payload = match decode_share(encoded) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Failed to load shared data: {}", e);
            println!("Could not decode share link; keeping saved state.");
            return Ok(());
        }
    };

    let mut store = open_store(db_path, backend)?;
    store.save(StatePatch {
        ratings: Some(payload.ratings.clone()),
        selected_fruit_ids: Some(payload.selected_fruit_ids.clone()),
        ..StatePatch::default()
    });

    if json_mode {
        let output = serde_json::json!({
            "opened": strip_data_param(url),
            "rating_count": payload.ratings.len(),
            "selected_count": payload.selected_fruit_ids.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Loaded {} ratings and {} selected fruits from the shared link",
        payload.ratings.len(),
        payload.selected_fruit_ids.len()
    );
    println!("{}", strip_data_param(url));
    Ok(())
}

// =============================================================================
// CLEAR COMMAND
// =============================================================================

/// Wipe the persisted session.
pub fn cmd_clear(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    force: bool,
) -> Result<(), FruitbenchError> {
    if !force {
        return Err(FruitbenchError::InvalidArgument(
            "refusing to clear the session without --force".to_string(),
        ));
    }

    let mut store = open_store(db_path, backend)?;
    store.clear();

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "cleared": true }))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!("Cleared the saved session");
    Ok(())
}
