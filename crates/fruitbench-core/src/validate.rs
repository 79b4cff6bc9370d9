//! # State Sanitization
//!
//! Defensive, field-by-field validation of untrusted state payloads
//! (persisted records, imported files, decoded share links).
//!
//! A field of the wrong shape is dropped and replaced by its default
//! rather than failing the whole load. Unlike ad-hoc type probing, the
//! pass returns the sanitized structure **plus** a report of every field
//! it rejected, so callers and tests can assert exactly what was dropped.

use crate::{AppState, Rating, SortColumn, SortDirection};
use serde_json::Value;
use std::fmt;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The value has the wrong JSON type (e.g. a string score, a float
    /// where an integer is required).
    WrongType,
    /// The value is well-typed but outside its allowed range.
    OutOfRange,
    /// The value names no known enumeration variant.
    UnknownVariant,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::WrongType => "wrong type",
            DropReason::OutOfRange => "out of range",
            DropReason::UnknownVariant => "unknown variant",
        };
        f.write_str(text)
    }
}

/// One rejected field: its dotted path and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedField {
    pub path: String,
    pub reason: DropReason,
}

impl DroppedField {
    fn new(path: impl Into<String>, reason: DropReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

/// The result of a sanitization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    /// The sanitized state, with every rejected field defaulted.
    pub state: AppState,
    /// Every field the pass rejected.
    pub dropped: Vec<DroppedField>,
}

/// Sanitize an untrusted state payload.
///
/// A non-object top level sanitizes to the default state. Absent fields
/// default silently; only present-but-invalid fields are reported.
#[must_use]
pub fn sanitize_state(raw: &Value) -> Sanitized {
    let mut state = AppState::default();
    let mut dropped = Vec::new();

    let Some(object) = raw.as_object() else {
        if !raw.is_null() {
            dropped.push(DroppedField::new("$", DropReason::WrongType));
        }
        return Sanitized { state, dropped };
    };

    // ratings: keep only entries that pass the full shape + range check.
    match object.get("ratings") {
        Some(Value::Object(ratings)) => {
            for (fruit_id, value) in ratings {
                match sanitize_rating(value) {
                    Ok(rating) => {
                        state.ratings.insert(fruit_id.clone(), rating);
                    }
                    Err(reason) => {
                        dropped.push(DroppedField::new(format!("ratings.{fruit_id}"), reason));
                    }
                }
            }
        }
        Some(_) => dropped.push(DroppedField::new("ratings", DropReason::WrongType)),
        None => {}
    }

    // selectedFruitIds: keep only string elements, order preserved.
    match object.get("selectedFruitIds") {
        Some(Value::Array(ids)) => {
            for (index, id) in ids.iter().enumerate() {
                match id.as_str() {
                    Some(id) => state.selected_fruit_ids.push(id.to_string()),
                    None => dropped.push(DroppedField::new(
                        format!("selectedFruitIds[{index}]"),
                        DropReason::WrongType,
                    )),
                }
            }
        }
        Some(_) => dropped.push(DroppedField::new("selectedFruitIds", DropReason::WrongType)),
        None => {}
    }

    // sortConfig: column and direction fall back to defaults independently.
    match object.get("sortConfig") {
        Some(Value::Object(sort_config)) => {
            if let Some(column) = sort_config.get("column") {
                match column.as_str().and_then(|s| s.parse::<SortColumn>().ok()) {
                    Some(column) => state.sort_config.column = column,
                    None => dropped.push(DroppedField::new(
                        "sortConfig.column",
                        DropReason::UnknownVariant,
                    )),
                }
            }
            if let Some(direction) = sort_config.get("direction") {
                match direction
                    .as_str()
                    .and_then(|s| s.parse::<SortDirection>().ok())
                {
                    Some(direction) => state.sort_config.direction = direction,
                    None => dropped.push(DroppedField::new(
                        "sortConfig.direction",
                        DropReason::UnknownVariant,
                    )),
                }
            }
        }
        Some(_) => dropped.push(DroppedField::new("sortConfig", DropReason::WrongType)),
        None => {}
    }

    // filterConfig: tags and searchQuery only, best-effort. Tags are NOT
    // checked against the catalog enumeration; unknown tags pass through.
    match object.get("filterConfig") {
        Some(Value::Object(filter_config)) => {
            if let Some(tags) = filter_config.get("tags") {
                match tags.as_array() {
                    Some(tags) => {
                        for (index, tag) in tags.iter().enumerate() {
                            match tag.as_str() {
                                Some(tag) => state.filter_config.tags.push(tag.to_string()),
                                None => dropped.push(DroppedField::new(
                                    format!("filterConfig.tags[{index}]"),
                                    DropReason::WrongType,
                                )),
                            }
                        }
                    }
                    None => dropped.push(DroppedField::new(
                        "filterConfig.tags",
                        DropReason::WrongType,
                    )),
                }
            }
            if let Some(query) = filter_config.get("searchQuery") {
                match query.as_str() {
                    Some(query) => state.filter_config.search_query = query.to_string(),
                    None => dropped.push(DroppedField::new(
                        "filterConfig.searchQuery",
                        DropReason::WrongType,
                    )),
                }
            }
        }
        Some(_) => dropped.push(DroppedField::new("filterConfig", DropReason::WrongType)),
        None => {}
    }

    Sanitized { state, dropped }
}

/// Validate one rating entry.
///
/// Requires a string `fruitId` and four integer scores in 0..=10. Floats
/// and numeric strings are wrong-typed; well-typed integers outside the
/// range are out-of-range.
pub fn sanitize_rating(raw: &Value) -> Result<Rating, DropReason> {
    let object = raw.as_object().ok_or(DropReason::WrongType)?;

    let fruit_id = object
        .get("fruitId")
        .and_then(Value::as_str)
        .ok_or(DropReason::WrongType)?;

    Ok(Rating {
        fruit_id: fruit_id.to_string(),
        flavor: sanitize_score(object.get("flavor"))?,
        nourishment: sanitize_score(object.get("nourishment"))?,
        reliability: sanitize_score(object.get("reliability"))?,
        practicality: sanitize_score(object.get("practicality"))?,
    })
}

fn sanitize_score(raw: Option<&Value>) -> Result<u8, DropReason> {
    let value = raw.ok_or(DropReason::WrongType)?;
    // as_i64 is None for floats and non-numbers alike: both are wrong-typed.
    let score = value.as_i64().ok_or(DropReason::WrongType)?;
    if (0..=i64::from(Rating::MAX_SCORE)).contains(&score) {
        Ok(score as u8)
    } else {
        Err(DropReason::OutOfRange)
    }
}

// =============================================================================
// TESTS
// =============================================================================
