//! Hot reload support.
//!
//! This module watches the environment file for changes and reruns the
//! loader when a burst of filesystem events settles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌─────────────┐
//! │   notify    │────▶│ scheduler loop │────▶│  EnvLoader  │
//! │  (events)   │     │ (gap + settle) │     │  .reload()  │
//! └─────────────┘     └────────────────┘     └─────────────┘
//!                            │                      │
//!                            ▼                      ▼
//!                     ┌─────────────┐      ┌───────────────┐
//!                     │  callbacks  │◀─────│ diff(old,new) │
//!                     │  + tracing  │      └───────────────┘
//!                     └─────────────┘
//! ```
//!
//! # Error resilience
//!
//! A failed reload keeps the previous valid snapshot and the environment
//! untouched; the error is reported and watching continues.
//!
//! # Known limitation
//!
//! Some notification backends lose the subscription when the watched file
//! is replaced via atomic rename-over. Editors that write this way may
//! stop triggering reloads until the watcher is restarted.

mod scheduler;
mod session;
mod types;

pub use scheduler::{ChangeCallback, ErrorCallback, ReloadCallbacks};
pub use session::WatchSession;
pub use types::FileEvent;
