//! Snapshot comparison.
//!
//! [`diff`] compares two [`ConfigMap`] snapshots and classifies every key
//! that differs. It is a pure function with no failure modes; the scheduler
//! runs it after each successful reload and reports the resulting events.

use std::fmt;

use crate::parser::ConfigMap;

/// A classified change between two configuration snapshots.
///
/// Events are transient per reload and are not persisted. The `Display`
/// impl produces the human-readable report lines emitted through the log
/// sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEvent {
    /// Key present in the new snapshot but not the old one.
    Added {
        /// The added key.
        key: String,
        /// Its value in the new snapshot.
        value: String,
    },

    /// Key present in both snapshots with differing values.
    Changed {
        /// The changed key.
        key: String,
        /// Value in the old snapshot.
        old: String,
        /// Value in the new snapshot.
        new: String,
    },

    /// Key present in the old snapshot but not the new one.
    ///
    /// Removed keys are reported but never unset from the live environment;
    /// see the crate-level documentation on this asymmetry.
    Removed {
        /// The removed key.
        key: String,
    },
}

impl DiffEvent {
    /// The key this event concerns.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Added { key, .. } | Self::Changed { key, .. } | Self::Removed { key } => key,
        }
    }
}

impl fmt::Display for DiffEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { key, value } => {
                write!(f, "new environment variable: {key} = {value}")
            }
            Self::Changed { key, old, new } => {
                write!(
                    f,
                    "environment variable changed: {key} = {new} (old value: {old})"
                )
            }
            Self::Removed { key } => write!(f, "environment variable removed: {key}"),
        }
    }
}

/// Compare two snapshots, returning one event per differing key in
/// ascending key order.
///
/// Keys with unchanged values produce no event.
#[must_use]
pub fn diff(old: &ConfigMap, new: &ConfigMap) -> Vec<DiffEvent> {
    let mut events = Vec::new();
    let mut old_iter = old.iter().peekable();
    let mut new_iter = new.iter().peekable();

    // Both iterators are key-sorted, so a single merge pass yields events
    // already ordered by key.
    loop {
        match (old_iter.peek().copied(), new_iter.peek().copied()) {
            (Some((old_key, old_value)), Some((new_key, new_value))) => {
                if old_key == new_key {
                    if old_value != new_value {
                        events.push(DiffEvent::Changed {
                            key: new_key.to_string(),
                            old: old_value.to_string(),
                            new: new_value.to_string(),
                        });
                    }
                    old_iter.next();
                    new_iter.next();
                } else if old_key < new_key {
                    events.push(DiffEvent::Removed {
                        key: old_key.to_string(),
                    });
                    old_iter.next();
                } else {
                    events.push(DiffEvent::Added {
                        key: new_key.to_string(),
                        value: new_value.to_string(),
                    });
                    new_iter.next();
                }
            }
            (Some((old_key, _)), None) => {
                events.push(DiffEvent::Removed {
                    key: old_key.to_string(),
                });
                old_iter.next();
            }
            (None, Some((new_key, new_value))) => {
                events.push(DiffEvent::Added {
                    key: new_key.to_string(),
                    value: new_value.to_string(),
                });
                new_iter.next();
            }
            (None, None) => break,
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> ConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reports_added_and_changed_but_not_unchanged() {
        let old = map(&[("A", "1"), ("B", "2")]);
        let new = map(&[("A", "1"), ("B", "3"), ("C", "4")]);

        let events = diff(&old, &new);
        assert_eq!(
            events,
            vec![
                DiffEvent::Changed {
                    key: "B".into(),
                    old: "2".into(),
                    new: "3".into(),
                },
                DiffEvent::Added {
                    key: "C".into(),
                    value: "4".into(),
                },
            ]
        );
    }

    #[test]
    fn reports_removed_keys() {
        let old = map(&[("A", "1"), ("B", "2")]);
        let new = map(&[("A", "1")]);

        let events = diff(&old, &new);
        assert_eq!(events, vec![DiffEvent::Removed { key: "B".into() }]);
    }

    #[test]
    fn identical_snapshots_produce_no_events() {
        let snapshot = map(&[("A", "1"), ("B", "2")]);
        assert!(diff(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn empty_old_snapshot_reports_everything_added() {
        let new = map(&[("B", "2"), ("A", "1")]);
        let events = diff(&ConfigMap::empty(), &new);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].key(), "A");
        assert_eq!(events[1].key(), "B");
    }

    #[test]
    fn events_are_sorted_by_key() {
        let old = map(&[("M", "1"), ("Z", "9")]);
        let new = map(&[("A", "0"), ("M", "2")]);

        let events = diff(&old, &new);
        let keys: Vec<&str> = events.iter().map(DiffEvent::key).collect();
        assert_eq!(keys, ["A", "M", "Z"]);
    }

    #[test]
    fn display_lines_are_human_readable() {
        let added = DiffEvent::Added {
            key: "PORT".into(),
            value: "8080".into(),
        };
        assert_eq!(added.to_string(), "new environment variable: PORT = 8080");

        let changed = DiffEvent::Changed {
            key: "HOST".into(),
            old: "a".into(),
            new: "b".into(),
        };
        assert_eq!(
            changed.to_string(),
            "environment variable changed: HOST = b (old value: a)"
        );

        let removed = DiffEvent::Removed { key: "OLD".into() };
        assert_eq!(removed.to_string(), "environment variable removed: OLD");
    }
}
