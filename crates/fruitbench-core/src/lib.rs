//! # fruitbench-core
//!
//! The deterministic rating engine for Fruitbench - THE LOGIC.
//!
//! This crate turns raw per-fruit ratings into sorted, tiered results and
//! keeps the session state durable and safe against malformed input:
//! - A fixed fruit catalog with category tags
//! - Pure scoring and tiering functions over four 0..=10 criteria
//! - A query engine (tag/search filtering, stable sorting, tier grouping)
//! - A versioned state store over an abstracted key-value backend, with
//!   field-by-field sanitization of anything loaded from an untrusted
//!   source, plus JSON export/import and base64 share-link encoding
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Has NO async, NO network dependencies (pure Rust)
//! - Uses integer arithmetic and `BTreeMap` only; derived views are
//!   deterministic functions of the state
//! - Never panics; state loads degrade to defaults instead of failing
//! - Never reads the wall clock; timestamps are the app layer's job

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod query;
pub mod rating;
pub mod share;
pub mod state;
pub mod storage;
pub mod types;
pub mod validate;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AppState, Criterion, FilterConfig, Fruit, FruitTag, FruitbenchError, RatedFruit, Rating,
    SortColumn, SortConfig, SortDirection, Tier,
};

// =============================================================================
// RE-EXPORTS: Rating Model
// =============================================================================

pub use rating::{
    A_THRESHOLD, B_THRESHOLD, C_THRESHOLD, MAX_TOTAL, S_THRESHOLD, calculate_tier, calculate_total,
    is_fully_rated, to_rated_fruit,
};

// =============================================================================
// RE-EXPORTS: Query Engine
// =============================================================================

pub use query::{
    FilterOptions, filter_by_search, filter_by_tags, filter_fruits, group_by_tier, rated_fruits,
    sort_rated_fruits,
};

// =============================================================================
// RE-EXPORTS: Persistence & Validation
// =============================================================================

pub use state::{STATE_VERSION, STORAGE_KEY, StatePatch, StateStore, StoreBackend};
pub use storage::{KvStore, MemoryKv, RedbKv};
pub use validate::{DropReason, DroppedField, Sanitized, sanitize_rating, sanitize_state};

// =============================================================================
// RE-EXPORTS: Share Encoding
// =============================================================================

pub use share::{
    DATA_PARAM, SharePayload, decode_share, encode_share, extract_data_param, share_url,
    strip_data_param,
};
