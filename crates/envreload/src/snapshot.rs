//! Thread-safe snapshot storage.
//!
//! [`SnapshotStore`] holds the current configuration snapshot and the one
//! loaded immediately before it, so the differ always has a last-good
//! baseline to compare against. Swaps are atomic with respect to readers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::parser::ConfigMap;

struct Snapshots {
    current: Arc<ConfigMap>,
    previous: Arc<ConfigMap>,
}

/// Holds the current and previous [`ConfigMap`] snapshots.
///
/// Invariant: `previous` always equals the value of `current` immediately
/// before the most recent successful swap; both are empty before the first
/// load. Readers never observe a partial update.
///
/// The epoch counter increments on every swap and allows cheap change
/// detection without comparing maps.
pub struct SnapshotStore {
    maps: RwLock<Snapshots>,
    epoch: AtomicU64,
}

impl SnapshotStore {
    /// Create a store with empty current and previous snapshots.
    #[must_use]
    pub fn new() -> Self {
        let empty = Arc::new(ConfigMap::empty());
        Self {
            maps: RwLock::new(Snapshots {
                current: Arc::clone(&empty),
                previous: empty,
            }),
            epoch: AtomicU64::new(0),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<ConfigMap> {
        Arc::clone(&self.maps.read().current)
    }

    /// The snapshot that was current before the most recent swap.
    #[must_use]
    pub fn previous(&self) -> Arc<ConfigMap> {
        Arc::clone(&self.maps.read().previous)
    }

    /// The number of swaps performed so far.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Install a new current snapshot, moving the prior current into
    /// previous. Returns the displaced snapshot.
    pub(crate) fn swap(&self, next: Arc<ConfigMap>) -> Arc<ConfigMap> {
        let displaced = {
            let mut maps = self.maps.write();
            let displaced = std::mem::replace(&mut maps.current, next);
            maps.previous = Arc::clone(&displaced);
            displaced
        };
        self.epoch.fetch_add(1, Ordering::Release);
        displaced
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> Arc<ConfigMap> {
        Arc::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn starts_empty_with_zero_epoch() {
        let store = SnapshotStore::new();
        assert!(store.current().is_empty());
        assert!(store.previous().is_empty());
        assert_eq!(store.epoch(), 0);
    }

    #[test]
    fn swap_moves_current_into_previous() {
        let store = SnapshotStore::new();
        let first = map(&[("A", "1")]);
        let second = map(&[("A", "2")]);

        store.swap(Arc::clone(&first));
        assert_eq!(store.current().get("A"), Some("1"));
        assert!(store.previous().is_empty());

        let displaced = store.swap(second);
        assert_eq!(displaced.get("A"), Some("1"));
        assert_eq!(store.current().get("A"), Some("2"));
        assert_eq!(store.previous().get("A"), Some("1"));
        assert_eq!(store.epoch(), 2);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        use std::thread;

        let store = Arc::new(SnapshotStore::new());
        store.swap(map(&[("A", "1"), ("B", "1")]));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let snapshot = store.current();
                        // Writers only install maps where A == B.
                        assert_eq!(snapshot.get("A"), snapshot.get("B"));
                    }
                })
            })
            .collect();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500u32 {
                    let value = i.to_string();
                    store.swap(map(&[("A", value.as_str()), ("B", value.as_str())]));
                }
            })
        };

        for handle in readers {
            handle.join().unwrap();
        }
        writer.join().unwrap();
    }
}
