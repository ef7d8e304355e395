//! Property-based tests for parser and differ invariants.
//!
//! These tests verify that critical invariants hold for all possible inputs,
//! not just hand-picked test cases.

#![allow(clippy::pedantic)]

use proptest::prelude::*;
use std::collections::BTreeMap;

use envreload::{ConfigMap, DiffEvent, diff};

// ============================================================================
// Parser Properties
// ============================================================================

mod parser_properties {
    use super::*;

    proptest! {
        /// Parsing never panics on any input.
        #[test]
        fn parse_never_panics(text in ".*") {
            let _ = ConfigMap::parse(&text);
        }

        /// Blank lines and comment lines contribute no entries.
        #[test]
        fn blanks_and_comments_contribute_nothing(
            padding in "[ \t]*",
            comment in "#[^\n=]*",
        ) {
            let text = format!("{padding}\n{padding}{comment}\n");
            prop_assert!(ConfigMap::parse(&text).is_empty());
        }

        /// Lines without a `=` separator contribute no entries.
        #[test]
        fn lines_without_separator_contribute_nothing(
            lines in prop::collection::vec("[^=\n#]*", 0..8),
        ) {
            let text = lines.join("\n");
            prop_assert!(ConfigMap::parse(&text).is_empty());
        }

        /// Serialize-then-parse reproduces an equivalent map for any set of
        /// well-formed entries.
        #[test]
        fn round_trip_for_well_formed_entries(
            entries in prop::collection::btree_map("[A-Z][A-Z0-9_]{0,10}", "[a-z0-9:/._-]{0,16}", 0..12),
        ) {
            let map: ConfigMap = entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let reparsed = ConfigMap::parse(&map.to_dotenv());
            prop_assert_eq!(map, reparsed);
        }

        /// With duplicate keys, the last occurrence wins.
        #[test]
        fn duplicate_keys_last_wins(
            key in "[A-Z][A-Z0-9_]{0,8}",
            first in "[a-z0-9]{0,8}",
            second in "[a-z0-9]{0,8}",
        ) {
            let text = format!("{key}={first}\n{key}={second}\n");
            let map = ConfigMap::parse(&text);
            prop_assert_eq!(map.len(), 1);
            prop_assert_eq!(map.get(&key), Some(second.as_str()));
        }
    }
}

// ============================================================================
// Differ Properties
// ============================================================================

mod differ_properties {
    use super::*;

    fn arb_map() -> impl Strategy<Value = ConfigMap> {
        prop::collection::btree_map("[A-E]", "[0-3]", 0..6)
            .prop_map(|entries: BTreeMap<String, String>| entries.into_iter().collect())
    }

    proptest! {
        /// Diffing a snapshot against itself yields no events.
        #[test]
        fn self_diff_is_empty(map in arb_map()) {
            prop_assert!(diff(&map, &map).is_empty());
        }

        /// Every reported key appears in at least one of the snapshots, and
        /// each key is reported at most once.
        #[test]
        fn events_cover_only_present_keys(old in arb_map(), new in arb_map()) {
            let events = diff(&old, &new);
            let mut seen = std::collections::BTreeSet::new();
            for event in &events {
                prop_assert!(seen.insert(event.key().to_string()), "duplicate key reported");
                match event {
                    DiffEvent::Added { key, value } => {
                        prop_assert_eq!(new.get(key), Some(value.as_str()));
                        prop_assert!(!old.contains_key(key));
                    }
                    DiffEvent::Changed { key, old: before, new: after } => {
                        prop_assert_eq!(old.get(key), Some(before.as_str()));
                        prop_assert_eq!(new.get(key), Some(after.as_str()));
                        prop_assert_ne!(before, after);
                    }
                    DiffEvent::Removed { key } => {
                        prop_assert!(old.contains_key(key));
                        prop_assert!(!new.contains_key(key));
                    }
                }
            }
        }

        /// Events come back sorted by key.
        #[test]
        fn events_are_key_sorted(old in arb_map(), new in arb_map()) {
            let events = diff(&old, &new);
            let keys: Vec<&str> = events.iter().map(DiffEvent::key).collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            prop_assert_eq!(keys, sorted);
        }
    }
}
