//! The active file-watch subscription.
//!
//! A [`WatchSession`] owns one `notify` subscription for one absolute path
//! and the background thread running the
//! [scheduler loop](super::scheduler). The watcher handle lives on the loop
//! thread, so its OS-level resources are released when the loop exits.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Sender, bounded};
use notify::{RecursiveMode, Watcher};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::loader::EnvLoader;

use super::scheduler::{ReloadCallbacks, scheduler_loop};
use super::types::FileEvent;

/// An active subscription to file-change notifications for one path.
///
/// Created by [`WatchSession::spawn`]; torn down by [`shutdown`]
/// (idempotent) or on drop. The loop thread is signaled, not joined:
/// it exits promptly on its own and drops the watcher with it.
///
/// [`shutdown`]: WatchSession::shutdown
pub struct WatchSession {
    path: PathBuf,
    shutdown_tx: Sender<()>,
    stopped: AtomicBool,
}

impl WatchSession {
    /// Subscribe to change notifications for the loader's file and start
    /// the debounced reload loop on a background thread.
    ///
    /// The loader's `reload_delay` is used for both debounce stages. Diff
    /// events and errors are reported through `tracing` and `callbacks`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathResolution`] if the configured path cannot be
    /// made absolute, or [`Error::WatchInit`] if the subscription cannot be
    /// established (missing path, watch resource limits) or the loop thread
    /// cannot be spawned.
    pub fn spawn(loader: Arc<EnvLoader>, callbacks: ReloadCallbacks) -> Result<Self> {
        let path = loader.resolved_path()?;
        let delay = loader.settings().reload_delay;

        let (event_tx, event_rx) = bounded::<FileEvent>(100);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(raw) => FileEvent::classify(&raw),
                Err(e) => Some(FileEvent::Error(e.to_string())),
            };
            if let Some(event) = event {
                let _ = event_tx.send(event);
            }
        })
        .map_err(|e| Error::watch_init("failed to create file watcher", Some(e)))?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|e| {
                Error::watch_init(format!("failed to watch '{}'", path.display()), Some(e))
            })?;

        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let loop_path = path.clone();
        thread::Builder::new()
            .name("envreload-watch".to_string())
            .spawn(move || {
                // Keep the subscription alive for the lifetime of the loop;
                // dropping it here releases the OS watch resources.
                let _watcher = watcher;
                debug!("watch loop started for {}", loop_path.display());
                scheduler_loop(
                    &event_rx,
                    &shutdown_rx,
                    delay,
                    move || loader.reload(),
                    &callbacks,
                );
                debug!("watch loop for {} terminated", loop_path.display());
            })
            .map_err(|e| Error::watch_init(format!("failed to spawn watch thread: {e}"), None))?;

        info!("starting hot reload watcher for: {}", path.display());

        Ok(Self {
            path,
            shutdown_tx,
            stopped: AtomicBool::new(false),
        })
    }

    /// The absolute path being watched.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`shutdown`](WatchSession::shutdown) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Signal the event loop to terminate and release the subscription.
    ///
    /// Idempotent: only the first call delivers the one-shot signal; any
    /// later call is a no-op. A pending settle timer is dropped with the
    /// loop, so no reload fires after shutdown.
    pub fn shutdown(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            let _ = self.shutdown_tx.send(());
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession")
            .field("path", &self.path)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
