//! # State Validation & Persistence Scenarios
//!
//! End-to-end scenarios over the persistence layer.
//!
//! ## Tiers
//! - T0: Sanitization of hostile payloads
//! - T1: Version envelope handling
//! - T2: Selection and rating workflows
//! - T3: Import/export round trips
//! - T4: Share links
//! - T5: Persistent (redb) backend

use fruitbench_core::{
    AppState, DropReason, KvStore, MemoryKv, Rating, STORAGE_KEY, SortColumn, SortDirection,
    StateStore, StoreBackend, Tier, catalog, rated_fruits, sort_rated_fruits,
};

// =============================================================================
// TIER T0: SANITIZATION OF HOSTILE PAYLOADS
// =============================================================================

mod t0_sanitization {
    use super::*;
    use fruitbench_core::sanitize_state;
    use serde_json::json;

    /// T0.1: Invalid ratings are dropped individually; the rest of the
    /// record survives.
    #[test]
    fn invalid_ratings_dropped_individually() {
        let raw = json!({
            "ratings": {
                "banana": {"fruitId": "banana", "flavor": 11, "nourishment": 8, "reliability": 10, "practicality": 10},
                "kiwi": {"fruitId": "kiwi", "flavor": "9", "nourishment": 8, "reliability": 8, "practicality": 8},
                "pear": {"fruitId": "pear", "flavor": 5, "nourishment": 5, "reliability": 5, "practicality": 5}
            },
            "selectedFruitIds": ["banana", "kiwi", "pear"]
        });

        let sanitized = sanitize_state(&raw);

        assert_eq!(sanitized.state.ratings.len(), 1);
        assert!(sanitized.state.ratings.contains_key("pear"));
        assert_eq!(sanitized.state.selected_fruit_ids.len(), 3);

        let reasons: Vec<(&str, DropReason)> = sanitized
            .dropped
            .iter()
            .map(|field| (field.path.as_str(), field.reason))
            .collect();
        assert!(reasons.contains(&("ratings.banana", DropReason::OutOfRange)));
        assert!(reasons.contains(&("ratings.kiwi", DropReason::WrongType)));
    }

    /// T0.2: A load through the store applies the same sanitization.
    #[test]
    fn store_load_sanitizes_stored_payload() {
        let mut kv = MemoryKv::new();
        kv.set(
            STORAGE_KEY,
            br#"{"version": 1, "state": {
                "ratings": {"banana": {"fruitId": "banana", "flavor": 11, "nourishment": 0, "reliability": 0, "practicality": 0}},
                "selectedFruitIds": ["banana"],
                "sortConfig": {"column": "tier", "direction": "asc"}
            }}"#,
        )
        .expect("seed");

        let store = StateStore::with_backend(StoreBackend::InMemory(kv));
        let sanitized = store.load_sanitized();

        assert!(sanitized.state.ratings.is_empty());
        assert_eq!(sanitized.state.selected_fruit_ids, vec!["banana"]);
        assert_eq!(sanitized.state.sort_config.column, SortColumn::Total);
        assert_eq!(sanitized.state.sort_config.direction, SortDirection::Asc);
        assert_eq!(sanitized.dropped.len(), 2);
    }
}

// =============================================================================
// TIER T1: VERSION ENVELOPE
// =============================================================================

mod t1_versioning {
    use super::*;

    fn store_with_record(record: &[u8]) -> StateStore {
        let mut kv = MemoryKv::new();
        kv.set(STORAGE_KEY, record).expect("seed");
        StateStore::with_backend(StoreBackend::InMemory(kv))
    }

    /// T1.1: A record stamped with a foreign version loads as exactly the
    /// default state.
    #[test]
    fn foreign_version_returns_default() {
        let store = store_with_record(
            br#"{"version": 2, "state": {"selectedFruitIds": ["banana"]}}"#,
        );
        assert_eq!(store.load(), AppState::default());
    }

    /// T1.2: A missing version field counts as a mismatch.
    #[test]
    fn missing_version_returns_default() {
        let store = store_with_record(br#"{"state": {"selectedFruitIds": ["banana"]}}"#);
        assert_eq!(store.load(), AppState::default());
    }

    /// T1.3: Unparseable records degrade to the default state.
    #[test]
    fn unparseable_record_returns_default() {
        let store = store_with_record(b"\xff\xfe not even text");
        assert_eq!(store.load(), AppState::default());
    }

    /// T1.4: A current-version record loads its payload.
    #[test]
    fn current_version_loads_payload() {
        let store = store_with_record(
            br#"{"version": 1, "state": {"selectedFruitIds": ["banana"]}}"#,
        );
        assert_eq!(store.load().selected_fruit_ids, vec!["banana"]);
    }

    /// T1.5: Saving stamps the current version.
    #[test]
    fn save_stamps_current_version() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");

        // Reload through the public API: a same-version record round-trips.
        assert_eq!(store.load().selected_fruit_ids, vec!["banana"]);
    }
}

// =============================================================================
// TIER T2: SELECTION AND RATING WORKFLOWS
// =============================================================================

mod t2_workflows {
    use super::*;

    /// T2.1: The documented bench scenario: rate banana and red apple,
    /// sort by total descending, banana leads with tier S.
    #[test]
    fn bench_scenario_orders_by_total() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.add_selected_fruit("apple-red");
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));
        store.save_rating(Rating::with_scores("apple-red", 8, 7, 9, 9));

        let state = store.load();
        let selected = catalog::fruits_by_ids(catalog::builtin(), &state.selected_fruit_ids);
        let rated = rated_fruits(&selected, &state.ratings);
        let sorted = sort_rated_fruits(&rated, SortColumn::Total, SortDirection::Desc);

        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[0].id, "banana");
        assert_eq!(sorted[0].total, 37);
        assert_eq!(sorted[0].tier, Tier::S);
        assert_eq!(sorted[1].id, "apple-red");
        assert_eq!(sorted[1].total, 33);
        assert_eq!(sorted[1].tier, Tier::A);
    }

    /// T2.2: Removing a selected fruit erases its rating; it disappears
    /// from derived views.
    #[test]
    fn remove_erases_rating_and_derived_view() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));

        store.remove_selected_fruit("banana");

        let state = store.load();
        let rated = rated_fruits(catalog::builtin(), &state.ratings);
        assert!(rated.iter().all(|fruit| fruit.id != "banana"));
        assert!(state.ratings.is_empty());
    }

    /// T2.3: An orphaned rating (fruit no longer selected) is tolerated by
    /// loads and simply absent from selection-scoped views.
    #[test]
    fn orphaned_rating_is_tolerated() {
        let mut store = StateStore::new();
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));

        let state = store.load();
        assert!(state.selected_fruit_ids.is_empty());
        assert_eq!(state.ratings.len(), 1);

        let selected = catalog::fruits_by_ids(catalog::builtin(), &state.selected_fruit_ids);
        assert!(rated_fruits(&selected, &state.ratings).is_empty());
    }

    /// T2.4: Sort config persists independently of other fields.
    #[test]
    fn sort_config_persists() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.save_sort_config(fruitbench_core::SortConfig {
            column: SortColumn::Name,
            direction: SortDirection::Asc,
        });

        let state = store.load();
        assert_eq!(state.sort_config.column, SortColumn::Name);
        assert_eq!(state.selected_fruit_ids, vec!["banana"]);
    }
}

// =============================================================================
// TIER T3: IMPORT / EXPORT
// =============================================================================

mod t3_import_export {
    use super::*;

    /// T3.1: Importing an export restores an equivalent session.
    #[test]
    fn round_trip_restores_session() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.add_selected_fruit("kiwi");
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));
        let exported = store.export_json().expect("export");

        let mut restored = StateStore::new();
        assert!(restored.import_json(&exported));

        let state = restored.load();
        assert_eq!(state.selected_fruit_ids, vec!["banana", "kiwi"]);
        assert_eq!(state.ratings["banana"].practicality, 10);
    }

    /// T3.2: Export files carry extra metadata (`exportedAt`); import
    /// ignores unknown keys.
    #[test]
    fn import_ignores_unknown_keys() {
        let mut store = StateStore::new();
        let file = r#"{
            "ratings": {"banana": {"fruitId": "banana", "flavor": 9, "nourishment": 8, "reliability": 10, "practicality": 10}},
            "selectedFruitIds": ["banana"],
            "exportedAt": "2025-11-02T09:30:00Z"
        }"#;

        assert!(store.import_json(file));
        assert_eq!(store.load().selected_fruit_ids, vec!["banana"]);
    }

    /// T3.3: Parse failure returns false and leaves state untouched.
    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");

        assert!(!store.import_json("{truncated"));
        assert!(!store.import_json("\"just a string\""));
        assert_eq!(store.load().selected_fruit_ids, vec!["banana"]);
    }

    /// T3.4: Import sanitizes: bad entries are dropped, good ones kept.
    #[test]
    fn import_sanitizes_entries() {
        let mut store = StateStore::new();
        let file = r#"{
            "ratings": {
                "banana": {"fruitId": "banana", "flavor": 11, "nourishment": 8, "reliability": 10, "practicality": 10},
                "pear": {"fruitId": "pear", "flavor": 5, "nourishment": 5, "reliability": 5, "practicality": 5}
            },
            "selectedFruitIds": ["banana", 7, "pear"]
        }"#;

        assert!(store.import_json(file));
        let state = store.load();
        assert_eq!(state.selected_fruit_ids, vec!["banana", "pear"]);
        assert!(state.ratings.contains_key("pear"));
        assert!(!state.ratings.contains_key("banana"));
    }
}

// =============================================================================
// TIER T4: SHARE LINKS
// =============================================================================

mod t4_share_links {
    use super::*;
    use fruitbench_core::{
        SharePayload, decode_share, extract_data_param, share_url, strip_data_param,
    };

    /// T4.1: A share link round-trips through URL extraction and decode.
    #[test]
    fn share_link_round_trip() {
        let mut store = StateStore::new();
        store.add_selected_fruit("banana");
        store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));

        let payload = SharePayload::from_state(&store.load());
        let url = share_url("https://fruitbench.app/", &payload).expect("url");

        let encoded = extract_data_param(&url).expect("param");
        let decoded = decode_share(encoded).expect("decode");
        assert_eq!(decoded, payload);

        // Consuming the link cleans the visible URL.
        assert_eq!(strip_data_param(&url), "https://fruitbench.app/");
    }

    /// T4.2: A corrupted link fails decode; the persisted record remains
    /// the fallback.
    #[test]
    fn corrupted_link_falls_back_to_store() {
        let mut store = StateStore::new();
        store.add_selected_fruit("pear");

        let url = "https://fruitbench.app/?data=!!corrupted!!";
        let encoded = extract_data_param(url).expect("param");
        assert!(decode_share(encoded).is_err());

        // Fallback path: the stored state is untouched.
        assert_eq!(store.load().selected_fruit_ids, vec!["pear"]);
    }
}

// =============================================================================
// TIER T5: PERSISTENT BACKEND
// =============================================================================

mod t5_persistent_backend {
    use super::*;

    /// T5.1: State survives a close/reopen cycle on the redb backend.
    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bench.db");

        {
            let mut store = StateStore::with_redb(&path).expect("open");
            assert!(store.is_persistent());
            store.add_selected_fruit("banana");
            store.save_rating(Rating::with_scores("banana", 9, 8, 10, 10));
        }

        let store = StateStore::with_redb(&path).expect("reopen");
        let state = store.load();
        assert_eq!(state.selected_fruit_ids, vec!["banana"]);
        assert_eq!(state.ratings["banana"].flavor, 9);
    }

    /// T5.2: Clear persists across reopen.
    #[test]
    fn clear_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bench.db");

        {
            let mut store = StateStore::with_redb(&path).expect("open");
            store.add_selected_fruit("banana");
            store.clear();
        }

        let store = StateStore::with_redb(&path).expect("reopen");
        assert_eq!(store.load(), AppState::default());
    }
}
