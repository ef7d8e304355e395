//! Error types.
//!
//! All failures are reported through [`Error`], which integrates with
//! [`miette`] for rich terminal diagnostics. The enum is `Clone` (underlying
//! causes are stored behind `Arc`) so the exactly-once initializer can
//! replay the first outcome to later callers.
//!
//! | Variant | When it occurs |
//! |---------|----------------|
//! | [`Error::PathResolution`] | The configured path could not be made absolute |
//! | [`Error::Read`] | The environment file is missing or unreadable |
//! | [`Error::WatchInit`] | The filesystem subscription could not be established |
//! | [`Error::WatchRuntime`] | The notification channel reported an error |

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error as ThisError;

/// Errors produced while loading or watching an environment file.
///
/// During initialization, [`Error::PathResolution`] and [`Error::Read`] are
/// fatal and surfaced to the caller. During a later debounced reload they
/// are non-fatal: the error is reported through the sink and the last-good
/// snapshot stays in place.
#[derive(Debug, Clone, ThisError, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// The configured file path could not be resolved to an absolute path.
    #[error("failed to resolve path '{path}': {source}")]
    #[diagnostic(
        code(envreload::path_resolution),
        help("Check that the path is valid and the working directory is accessible")
    )]
    PathResolution {
        /// The path as configured.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The environment file is missing or unreadable.
    #[error("failed to read environment file '{path}': {source}")]
    #[diagnostic(
        code(envreload::read_error),
        help("Ensure the file exists and you have read permissions")
    )]
    Read {
        /// The resolved file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The filesystem subscription could not be established.
    ///
    /// This aborts hot-reload setup but does not invalidate an
    /// already-successful first load.
    #[error("failed to initialize file watcher: {message}")]
    #[diagnostic(
        code(envreload::watch_init),
        help("Check that the watched path exists and watch resource limits are not exhausted")
    )]
    WatchInit {
        /// Human-readable error message.
        message: String,
        /// The underlying notify error, if available.
        #[source]
        source: Option<Arc<notify::Error>>,
    },

    /// The notification channel reported an error.
    ///
    /// Logged by the scheduler; the event loop keeps running unless the
    /// channel itself closed.
    #[error("file watcher reported an error: {message}")]
    #[diagnostic(code(envreload::watch_runtime))]
    WatchRuntime {
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Create a new `PathResolution` error.
    pub fn path_resolution(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::PathResolution {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Create a new `Read` error.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Create a new `WatchInit` error.
    pub fn watch_init(message: impl Into<String>, source: Option<notify::Error>) -> Self {
        Self::WatchInit {
            message: message.into(),
            source: source.map(Arc::new),
        }
    }

    /// Create a new `WatchRuntime` error.
    pub fn watch_runtime(message: impl Into<String>) -> Self {
        Self::WatchRuntime {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
