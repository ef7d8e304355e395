//! Exactly-once process-wide initialization.
//!
//! [`init`] performs one physical load (and optionally starts the singleton
//! [`WatchSession`]) no matter how many threads race into it; every caller
//! observes the first outcome. The guarantee is carried by [`InitLatch`],
//! an explicit state-guarded initializer built from a mutex-protected state
//! flag and a condvar.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::error::Result;
use crate::loader::{EnvLoader, Settings};
use crate::watch::{ReloadCallbacks, WatchSession};

enum LatchState<T> {
    /// No caller has started the initializer yet.
    Idle,
    /// One caller is running the initializer; others wait on the condvar.
    Running,
    /// The initializer finished; its outcome is replayed to every caller.
    Complete(T),
}

/// A one-shot initialization latch.
///
/// Exactly one caller executes the closure passed to
/// [`get_or_init`](InitLatch::get_or_init); concurrent callers block until
/// it completes and then receive a clone of the same outcome.
pub(crate) struct InitLatch<T> {
    state: Mutex<LatchState<T>>,
    done: Condvar,
}

impl<T: Clone> InitLatch<T> {
    pub(crate) const fn new() -> Self {
        Self {
            state: Mutex::new(LatchState::Idle),
            done: Condvar::new(),
        }
    }

    pub(crate) fn get_or_init<F>(&self, init: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut state = self.state.lock();
        loop {
            match &*state {
                LatchState::Complete(value) => return value.clone(),
                LatchState::Running => {
                    self.done.wait(&mut state);
                }
                LatchState::Idle => break,
            }
        }
        *state = LatchState::Running;
        drop(state);

        // Run without the lock so waiters block on the condvar, not the
        // initializer itself.
        let value = init();

        let mut state = self.state.lock();
        *state = LatchState::Complete(value.clone());
        self.done.notify_all();
        value
    }
}

static INIT: InitLatch<Result<()>> = InitLatch::new();
static SESSION: Mutex<Option<WatchSession>> = Mutex::new(None);

/// Load the environment file into the process environment, exactly once.
///
/// The first call performs the load; if `settings.hot_reload` is set it
/// also starts the singleton [`WatchSession`] with the given callbacks.
/// Subsequent calls are no-ops returning a clone of the first outcome,
/// even under concurrency.
///
/// # Errors
///
/// [`Error::PathResolution`](crate::Error::PathResolution) and
/// [`Error::Read`](crate::Error::Read) from the first load are fatal to
/// initialization. [`Error::WatchInit`](crate::Error::WatchInit) aborts
/// hot-reload setup but the first load's effects on the environment stand.
pub fn init(settings: Settings, callbacks: ReloadCallbacks) -> Result<()> {
    INIT.get_or_init(move || -> Result<()> {
        let hot_reload = settings.hot_reload;
        let loader = Arc::new(EnvLoader::new(settings));
        loader.reload()?;

        if hot_reload {
            let session = WatchSession::spawn(loader, callbacks)?;
            *SESSION.lock() = Some(session);
        }
        Ok(())
    })
}

/// Stop the hot reload watcher started by [`init`], if any.
///
/// Idempotent: safe to call any number of times, before or after `init`.
/// The environment and the last-good snapshot are unaffected.
pub fn shutdown() {
    if let Some(session) = SESSION.lock().as_ref() {
        session.shutdown();
    }
}
