//! Reading, parsing, and applying the environment file.
//!
//! [`EnvLoader`] owns the [`SnapshotStore`] and the [`EnvironmentStore`] it
//! applies parsed values to. [`EnvLoader::reload`] is the single mutation
//! path: it holds an exclusive lock for the read-parse-apply-swap sequence,
//! so concurrent reload attempts cannot interleave, while environment
//! readers stay unblocked.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::diff::{DiffEvent, diff};
use crate::env::{EnvironmentStore, ProcessEnv};
use crate::error::{Error, Result};
use crate::parser::ConfigMap;
use crate::snapshot::SnapshotStore;

/// Recognized configuration options.
///
/// ```
/// use std::time::Duration;
/// use envreload::Settings;
///
/// let settings = Settings::new()
///     .file_path(".env.local")
///     .hot_reload(true)
///     .reload_delay(Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// Location of the environment file. Default: `.env`.
    pub file_path: PathBuf,
    /// Whether [`init`](crate::init) starts the file watcher. Default: `false`.
    pub hot_reload: bool,
    /// Debounce window for both the gap filter and the settle timer.
    /// Default: 2 seconds.
    pub reload_delay: Duration,
}

impl Settings {
    /// Settings with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the environment file path.
    #[must_use]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    /// Enable or disable hot reload.
    #[must_use]
    pub const fn hot_reload(mut self, enabled: bool) -> Self {
        self.hot_reload = enabled;
        self
    }

    /// Set the debounce window.
    #[must_use]
    pub const fn reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(".env"),
            hot_reload: false,
            reload_delay: Duration::from_secs(2),
        }
    }
}

/// The snapshots surrounding one successful reload.
///
/// `previous` is the snapshot displaced by the reload; `current` is the one
/// just installed. Diffing happens on these after the apply lock is
/// released, so reporting never blocks a concurrent reload attempt.
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    /// The snapshot that was current before this reload.
    pub previous: Arc<ConfigMap>,
    /// The snapshot installed by this reload.
    pub current: Arc<ConfigMap>,
}

impl ReloadOutcome {
    /// Classify every key that differs between the two snapshots.
    #[must_use]
    pub fn diff(&self) -> Vec<DiffEvent> {
        diff(&self.previous, &self.current)
    }
}

/// Loads the environment file and applies it to an [`EnvironmentStore`].
pub struct EnvLoader {
    settings: Settings,
    env: Arc<dyn EnvironmentStore>,
    store: SnapshotStore,
    /// Serializes reload-vs-reload; held for read, parse, apply, and swap.
    apply_lock: Mutex<()>,
}

impl EnvLoader {
    /// Create a loader applying to the real process environment.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_env_store(settings, Arc::new(ProcessEnv))
    }

    /// Create a loader applying to a caller-supplied environment table.
    #[must_use]
    pub fn with_env_store(settings: Settings, env: Arc<dyn EnvironmentStore>) -> Self {
        Self {
            settings,
            env,
            store: SnapshotStore::new(),
            apply_lock: Mutex::new(()),
        }
    }

    /// The settings this loader was built with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The snapshot store holding the current and previous maps.
    #[must_use]
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// The environment table values are applied to.
    #[must_use]
    pub fn env(&self) -> &Arc<dyn EnvironmentStore> {
        &self.env
    }

    /// Resolve the configured file path to an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathResolution`] if the path cannot be made
    /// absolute.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        std::path::absolute(&self.settings.file_path)
            .map_err(|e| Error::path_resolution(&self.settings.file_path, e))
    }

    /// Read, parse, and apply the environment file, then install the new
    /// snapshot.
    ///
    /// Every parsed key overwrites any existing value in the environment
    /// table. Keys absent from the file are never unset. On failure nothing
    /// is mutated: the snapshot store and the environment keep their
    /// pre-reload state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathResolution`] or [`Error::Read`] if the file
    /// cannot be located or read.
    pub fn reload(&self) -> Result<ReloadOutcome> {
        let path = self.resolved_path()?;

        let _guard = self.apply_lock.lock();
        debug!("loading environment from {}", path.display());

        let text = std::fs::read_to_string(&path).map_err(|e| Error::read(&path, e))?;
        let map = Arc::new(ConfigMap::parse(&text));

        for (key, value) in map.iter() {
            self.env.set(key, value);
        }
        let previous = self.store.swap(Arc::clone(&map));

        Ok(ReloadOutcome {
            previous,
            current: map,
        })
    }
}

impl std::fmt::Debug for EnvLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvLoader")
            .field("settings", &self.settings)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
