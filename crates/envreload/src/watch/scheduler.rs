//! Debounced reload scheduling.
//!
//! The scheduler consumes the watcher's classified event stream and
//! coalesces bursts of events into single reloads with a two-stage
//! debounce:
//!
//! 1. **Gap filter** - an event arriving less than `reload_delay` after the
//!    previously accepted event is dropped entirely, bounding reload
//!    frequency under sustained rapid writes.
//! 2. **Settle timer** - an accepted event (re)arms a deadline
//!    `reload_delay` in the future; the reload fires only once the file has
//!    been quiet for a full window.
//!
//! State machine: Idle --accepted event--> PendingReload (deadline armed)
//! --deadline fires--> reload + diff --> Idle; an accepted event while
//! pending re-arms the deadline; shutdown terminates from any state,
//! dropping the pending deadline.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, never};
use tracing::{info, trace, warn};

use crate::diff::{DiffEvent, diff};
use crate::error::Error;
use crate::loader::ReloadOutcome;

use super::types::FileEvent;

/// Callback invoked for each reported diff event.
pub type ChangeCallback = Box<dyn Fn(&DiffEvent) + Send + Sync + 'static>;

/// Callback invoked for reload and watch errors.
pub type ErrorCallback = Box<dyn Fn(&Error) + Send + Sync + 'static>;

/// Caller-supplied sinks for reload results.
///
/// Diff events and errors are always logged through `tracing`; callbacks
/// are invoked in addition when registered.
///
/// ```
/// use envreload::ReloadCallbacks;
///
/// let callbacks = ReloadCallbacks::new()
///     .on_change(|event| println!("{event}"))
///     .on_error(|err| eprintln!("{err}"));
/// ```
#[derive(Default)]
pub struct ReloadCallbacks {
    on_change: Option<ChangeCallback>,
    on_error: Option<ErrorCallback>,
}

impl ReloadCallbacks {
    /// No callbacks; reporting goes to `tracing` only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for each reported [`DiffEvent`].
    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DiffEvent) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Register a callback for reload and watch errors.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    fn change(&self, event: &DiffEvent) {
        if let Some(callback) = &self.on_change {
            callback(event);
        }
    }

    fn error(&self, error: &Error) {
        if let Some(callback) = &self.on_error {
            callback(error);
        }
    }
}

impl std::fmt::Debug for ReloadCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadCallbacks")
            .field("on_change", &self.on_change.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Gap-filter and settle-timer state.
///
/// Mutated only from the scheduler loop. Time is passed in explicitly so
/// the filtering rules are testable without sleeping.
#[derive(Debug)]
pub(crate) struct DebounceState {
    delay: Duration,
    last_accepted: Option<Instant>,
    deadline: Option<Instant>,
}

impl DebounceState {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_accepted: None,
            deadline: None,
        }
    }

    /// Apply the gap filter to an event observed at `now`.
    ///
    /// Returns `false` if the event falls inside the gap and is dropped.
    /// On acceptance the settle deadline is (re)armed `delay` after `now`.
    pub(crate) fn accept_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.delay {
                return false;
            }
        }
        self.last_accepted = Some(now);
        self.deadline = Some(now + self.delay);
        true
    }

    /// The pending settle deadline, if an accepted event is awaiting
    /// quiescence.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Clear the pending deadline after it fires.
    pub(crate) fn disarm(&mut self) {
        self.deadline = None;
    }
}

/// The watcher-event consumption loop.
///
/// Blocks on whichever comes first: the next classified event, the pending
/// settle deadline, or the shutdown signal. This is the only blocking wait
/// in the core. The loop exits when shutdown is signaled or the event
/// channel closes; a pending deadline is dropped with it.
pub(crate) fn scheduler_loop<F>(
    events: &Receiver<FileEvent>,
    shutdown: &Receiver<()>,
    delay: Duration,
    reload: F,
    callbacks: &ReloadCallbacks,
) where
    F: Fn() -> Result<ReloadOutcome, Error>,
{
    let mut debounce = DebounceState::new(delay);

    loop {
        let timer = debounce
            .deadline()
            .map_or_else(never, crossbeam_channel::at);

        crossbeam_channel::select! {
            recv(events) -> event => match event {
                Ok(event) if event.triggers_reload() => {
                    if !debounce.accept_at(Instant::now()) {
                        trace!("dropped event inside debounce gap: {event}");
                    }
                }
                Ok(FileEvent::Error(message)) => {
                    let error = Error::watch_runtime(message);
                    warn!("{error}");
                    callbacks.error(&error);
                }
                Ok(event) => trace!("ignoring event: {event}"),
                Err(_) => break,
            },
            recv(timer) -> _ => {
                debounce.disarm();
                run_reload(&reload, callbacks);
            }
            recv(shutdown) -> _ => break,
        }
    }
}

/// Reload once and report the outcome.
///
/// The diff is computed and reported after the loader has released its
/// apply lock. Failures leave the last-good snapshot in place and are
/// reported without terminating the loop.
fn run_reload<F>(reload: &F, callbacks: &ReloadCallbacks)
where
    F: Fn() -> Result<ReloadOutcome, Error>,
{
    match reload() {
        Ok(outcome) => {
            info!("successfully reloaded environment file");
            for event in diff(&outcome.previous, &outcome.current) {
                info!("{event}");
                callbacks.change(&event);
            }
        }
        Err(error) => {
            warn!("reload failed: {error}");
            callbacks.error(&error);
        }
    }
}
