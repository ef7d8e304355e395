//! # envreload
//!
//! Dotenv-style environment loading with debounced hot reload and change
//! diffing.
//!
//! `envreload` reads a `KEY=VALUE` text file into the process environment
//! and can watch that file for changes, reloading and reporting which keys
//! were added, changed, or removed - without restarting the process. Bursts
//! of filesystem events are coalesced into a single reload by a two-stage
//! debounce (gap filter + settle timer).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use envreload::{ReloadCallbacks, Settings};
//!
//! fn main() -> Result<(), envreload::Error> {
//!     envreload::init(
//!         Settings::new()
//!             .file_path(".env")
//!             .hot_reload(true)
//!             .reload_delay(Duration::from_secs(2)),
//!         ReloadCallbacks::new()
//!             .on_change(|event| println!("{event}"))
//!             .on_error(|err| eprintln!("{err}")),
//!     )?;
//!
//!     // ... run the application; the file is reloaded in the background ...
//!
//!     envreload::shutdown();
//!     Ok(())
//! }
//! ```
//!
//! Initialization is exactly-once: concurrent callers all observe the first
//! outcome, and at most one watch session exists per process. For embedding
//! and tests, the instance-level API ([`EnvLoader`], [`WatchSession`],
//! [`MemoryEnv`]) gives the same machinery without global state.
//!
//! ## File format
//!
//! UTF-8 text, one `KEY=VALUE` pair per line. Blank lines and lines starting
//! with `#` are ignored, as are lines without `=`. No quoting or escaping;
//! duplicate keys resolve to the last occurrence.
//!
//! ## Reload semantics
//!
//! Parsed keys overwrite existing environment values. Keys removed from the
//! file are reported as [`DiffEvent::Removed`] but are **never unset** from
//! the live environment - values are only ever added or overwritten. This
//! asymmetry is intentional and preserved from the reference behavior.
//!
//! A failed reload (file missing, unreadable) leaves the last-good snapshot
//! and the environment untouched; the error is reported and watching
//! continues.
//!
//! ## Logging
//!
//! Status and diff lines are emitted through [`tracing`]. The crate never
//! installs a subscriber; wiring one up is the embedder's job.
//!
//! ## Known limitations
//!
//! Some notification backends lose the file subscription when the watched
//! file is replaced via atomic rename-over (common with `sed -i` and some
//! editors). In-place writes are detected reliably.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]

mod diff;
mod env;
mod error;
mod init;
mod loader;
mod parser;
mod snapshot;

pub mod watch;

pub use diff::{DiffEvent, diff};
pub use env::{EnvironmentStore, MemoryEnv, ProcessEnv};
pub use error::{Error, Result};
pub use init::{init, shutdown};
pub use loader::{EnvLoader, ReloadOutcome, Settings};
pub use parser::ConfigMap;
pub use snapshot::SnapshotStore;

// Re-export for convenience
pub use watch::{ReloadCallbacks, WatchSession};
