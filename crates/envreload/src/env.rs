//! Environment table abstraction.
//!
//! The process environment is global, side-effecting state. Wrapping it in
//! the [`EnvironmentStore`] trait turns it into an explicit collaborator the
//! loader is handed, so embedders and tests can substitute an in-memory
//! table without touching the real process state.

use std::collections::HashMap;

use parking_lot::RwLock;

/// A process-wide key/value table that loaded configuration is applied to.
///
/// Implementations must be safe to read from any thread. Writes are only
/// issued while the loader holds its exclusive apply lock, so `set` is never
/// invoked concurrently by this crate.
pub trait EnvironmentStore: Send + Sync {
    /// Set a variable, overwriting any existing value.
    fn set(&self, key: &str, value: &str);

    /// Read a variable, or `None` if unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment, backed by `std::env`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvironmentStore for ProcessEnv {
    fn set(&self, key: &str, value: &str) {
        // SAFETY: this crate only calls `set` from inside the loader's
        // exclusive apply lock, so no two threads mutate the environment
        // table through this store at the same time.
        unsafe { std::env::set_var(key, value) };
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment table.
///
/// Useful for tests and for embedders that want reload semantics without
/// mutating the real process environment.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryEnv {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out the current contents.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().clone()
    }
}

impl EnvironmentStore for MemoryEnv {
    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}
