//! # State Store
//!
//! The versioned persistence layer over a key-value backend.
//!
//! One durable record lives under [`STORAGE_KEY`], wrapped in an envelope
//! carrying [`STATE_VERSION`]. Loading is never fatal: an absent or
//! unparseable record yields the default state, a foreign version discards
//! the stored data wholesale (no forward migration), and anything else is
//! sanitized field-by-field before it is trusted.
//!
//! The store object is the only mutation entry point; there is no
//! module-level state. Read-modify-write sequences are not transactional;
//! the design relies on the single-writer assumption and does not guard
//! against multiple processes sharing one database.

use crate::storage::{KvStore, MemoryKv, RedbKv};
use crate::validate::{Sanitized, sanitize_state};
use crate::{AppState, FilterConfig, FruitbenchError, Rating, SortConfig};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// The fixed key the session record is stored under.
pub const STORAGE_KEY: &str = "fruitbench-state";

/// Current schema version of the persisted record. A stored record with
/// any other version is discarded on load.
pub const STATE_VERSION: u32 = 1;

// =============================================================================
// ERROR LOGGING HELPERS
// =============================================================================

/// Log a swallowed storage error to stderr.
///
/// Write and serialization failures are reported, not propagated: the
/// caller sees a best-effort no-op. The core avoids a tracing dependency
/// to stay minimal; the app layer redirects stderr if needed.
fn log_warn(context: &str, error: &dyn std::fmt::Display) {
    eprintln!(
        "{{\"level\":\"warn\",\"target\":\"fruitbench_core::state\",\"message\":\"{} failed: {}\"}}",
        context, error
    );
}

// =============================================================================
// RECORD ENVELOPE
// =============================================================================

/// The durable envelope written to storage. Reads go through
/// [`sanitize_state`] instead of deserializing this shape directly.
#[derive(Debug, Serialize)]
struct StoredRecord<'a> {
    version: u32,
    state: &'a AppState,
}

// =============================================================================
// PARTIAL UPDATES
// =============================================================================

/// A partial state update: present fields replace their counterparts,
/// absent fields are left as loaded.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub ratings: Option<std::collections::BTreeMap<String, Rating>>,
    pub selected_fruit_ids: Option<Vec<String>>,
    pub sort_config: Option<SortConfig>,
    pub filter_config: Option<FilterConfig>,
}

impl StatePatch {
    fn apply(self, state: &mut AppState) {
        if let Some(ratings) = self.ratings {
            state.ratings = ratings;
        }
        if let Some(ids) = self.selected_fruit_ids {
            state.selected_fruit_ids = ids;
        }
        if let Some(sort_config) = self.sort_config {
            state.sort_config = sort_config;
        }
        if let Some(filter_config) = self.filter_config {
            state.filter_config = filter_config;
        }
    }
}

// =============================================================================
// STATE STORE
// =============================================================================

/// Storage backend for a [`StateStore`].
#[derive(Debug)]
pub enum StoreBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryKv),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbKv),
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::InMemory(MemoryKv::new())
    }
}

/// The explicit owner of the persisted session record.
///
/// All reads and writes of the durable record go through this object;
/// `load`, `save`, and `clear` (plus the convenience wrappers built on
/// them) are its only mutation entry points.
#[derive(Debug, Default)]
pub struct StateStore {
    backend: StoreBackend,
}

impl StateStore {
    /// Create a store with a fresh in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, FruitbenchError> {
        Ok(Self {
            backend: StoreBackend::Persistent(RedbKv::open(path)?),
        })
    }

    /// Create a store over an existing backend.
    #[must_use]
    pub fn with_backend(backend: StoreBackend) -> Self {
        Self { backend }
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StoreBackend::Persistent(_))
    }

    fn kv(&self) -> &dyn KvStore {
        match &self.backend {
            StoreBackend::InMemory(kv) => kv,
            StoreBackend::Persistent(kv) => kv,
        }
    }

    fn kv_mut(&mut self) -> &mut dyn KvStore {
        match &mut self.backend {
            StoreBackend::InMemory(kv) => kv,
            StoreBackend::Persistent(kv) => kv,
        }
    }

    // =========================================================================
    // LOAD / SAVE / CLEAR
    // =========================================================================

    /// Load the persisted state.
    ///
    /// Absent or unparseable records and version mismatches all degrade to
    /// the default state; anything else is sanitized before it is
    /// returned. Never fails outward.
    #[must_use]
    pub fn load(&self) -> AppState {
        self.load_sanitized().state
    }

    /// Load the persisted state along with the sanitization report.
    #[must_use]
    pub fn load_sanitized(&self) -> Sanitized {
        let default = || Sanitized {
            state: AppState::default(),
            dropped: Vec::new(),
        };

        let bytes = match self.kv().get(STORAGE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return default(),
            Err(e) => {
                log_warn("load", &e);
                return default();
            }
        };

        let record: Value = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                log_warn("load", &e);
                return default();
            }
        };

        let version = record.get("version").and_then(Value::as_u64);
        if version != Some(u64::from(STATE_VERSION)) {
            log_warn("load", &"storage version mismatch, using default state");
            return default();
        }

        sanitize_state(record.get("state").unwrap_or(&Value::Null))
    }

    /// Merge a partial update over the current state and write it back.
    ///
    /// Read-modify-write, not atomic. Write failure is logged and
    /// swallowed.
    pub fn save(&mut self, patch: StatePatch) {
        let mut state = self.load();
        patch.apply(&mut state);
        self.write_state(&state);
    }

    fn write_state(&mut self, state: &AppState) {
        let record = StoredRecord {
            version: STATE_VERSION,
            state,
        };
        let bytes = match serde_json::to_vec(&record) {
            Ok(bytes) => bytes,
            Err(e) => {
                log_warn("save", &e);
                return;
            }
        };
        if let Err(e) = self.kv_mut().set(STORAGE_KEY, &bytes) {
            log_warn("save", &e);
        }
    }

    /// Delete the persisted record entirely. Subsequent loads return the
    /// default state.
    pub fn clear(&mut self) {
        if let Err(e) = self.kv_mut().remove(STORAGE_KEY) {
            log_warn("clear", &e);
        }
    }

    // =========================================================================
    // CONVENIENCE WRAPPERS
    // =========================================================================

    /// Store a rating, keyed by its fruit id.
    pub fn save_rating(&mut self, rating: Rating) {
        let mut state = self.load();
        state.ratings.insert(rating.fruit_id.clone(), rating);
        self.write_state(&state);
    }

    /// Delete the rating for a fruit, if present.
    pub fn delete_rating(&mut self, fruit_id: &str) {
        let mut state = self.load();
        state.ratings.remove(fruit_id);
        self.write_state(&state);
    }

    /// Replace the selection wholesale.
    pub fn save_selected_fruits(&mut self, fruit_ids: Vec<String>) {
        let mut state = self.load();
        state.selected_fruit_ids = fruit_ids;
        self.write_state(&state);
    }

    /// Add a fruit to the selection. Idempotent: a fruit that is already
    /// selected leaves the stored record untouched.
    pub fn add_selected_fruit(&mut self, fruit_id: &str) {
        let mut state = self.load();
        if !state.selected_fruit_ids.iter().any(|id| id == fruit_id) {
            state.selected_fruit_ids.push(fruit_id.to_string());
            self.write_state(&state);
        }
    }

    /// Remove a fruit from the selection, deleting its rating with it so
    /// removed fruits never leave an orphaned rating behind.
    pub fn remove_selected_fruit(&mut self, fruit_id: &str) {
        let mut state = self.load();
        state.selected_fruit_ids.retain(|id| id != fruit_id);
        state.ratings.remove(fruit_id);
        self.write_state(&state);
    }

    /// Persist the sort configuration.
    pub fn save_sort_config(&mut self, sort_config: SortConfig) {
        self.save(StatePatch {
            sort_config: Some(sort_config),
            ..StatePatch::default()
        });
    }

    // =========================================================================
    // EXPORT / IMPORT
    // =========================================================================

    /// Serialize the current (validated) state as pretty JSON.
    pub fn export_json(&self) -> Result<String, FruitbenchError> {
        serde_json::to_string_pretty(&self.load())
            .map_err(|e| FruitbenchError::SerializationError(e.to_string()))
    }

    /// Import state from JSON text.
    ///
    /// The payload is validated exactly as `load` validates a stored
    /// record. Returns `true` on success; a parse failure or a non-object
    /// payload yields `false` and leaves the existing state untouched.
    /// Never fails outward.
    pub fn import_json(&mut self, text: &str) -> bool {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                log_warn("import", &e);
                return false;
            }
        };
        if !value.is_object() {
            log_warn("import", &"payload is not a JSON object");
            return false;
        }

        let sanitized = sanitize_state(&value);
        self.write_state(&sanitized.state);
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SortColumn, SortDirection};

    #[test]
    fn load_on_empty_store_is_default() {
        let store = StateStore::new();
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn save_rating_round_trips() {
        let mut store = StateStore::new();
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));

        let state = store.load();
        assert_eq!(state.ratings["banana"].flavor, 9);
    }

    #[test]
    fn version_mismatch_discards_stored_state() {
        let mut kv = MemoryKv::new();
        kv.set(
            STORAGE_KEY,
            br#"{"version": 99, "state": {"selectedFruitIds": ["banana"]}}"#,
        )
        .expect("seed");

        let store = StateStore::with_backend(StoreBackend::InMemory(kv));
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn unparseable_record_degrades_to_default() {
        let mut kv = MemoryKv::new();
        kv.set(STORAGE_KEY, b"{not json").expect("seed");

        let store = StateStore::with_backend(StoreBackend::InMemory(kv));
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn add_selected_fruit_is_idempotent() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.add_selected_fruit("banana");
        store.add_selected_fruit("pear");

        assert_eq!(store.load().selected_fruit_ids, vec!["banana", "pear"]);
    }

    #[test]
    fn save_selected_fruits_replaces_selection() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");

        store.save_selected_fruits(vec!["kiwi".to_string(), "pear".to_string()]);
        assert_eq!(store.load().selected_fruit_ids, vec!["kiwi", "pear"]);
    }

    #[test]
    fn remove_selected_fruit_erases_rating() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));

        store.remove_selected_fruit("banana");

        let state = store.load();
        assert!(state.selected_fruit_ids.is_empty());
        assert!(!state.ratings.contains_key("banana"));
    }

    #[test]
    fn save_patch_merges_only_present_fields() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");

        store.save(StatePatch {
            sort_config: Some(SortConfig {
                column: SortColumn::Name,
                direction: SortDirection::Asc,
            }),
            ..StatePatch::default()
        });

        let state = store.load();
        assert_eq!(state.selected_fruit_ids, vec!["banana"]);
        assert_eq!(state.sort_config.column, SortColumn::Name);
    }

    #[test]
    fn clear_resets_to_default() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.clear();
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn import_rejects_non_object_payloads() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");

        assert!(!store.import_json("not json at all"));
        assert!(!store.import_json("42"));

        // Existing state untouched after failed imports.
        assert_eq!(store.load().selected_fruit_ids, vec!["banana"]);
    }

    #[test]
    fn import_export_round_trip() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));
        let exported = store.export_json().expect("export");

        let mut other = StateStore::new();
        assert!(other.import_json(&exported));
        assert_eq!(other.load(), store.load());
    }
}
