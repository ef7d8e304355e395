//! Classified filesystem events.

use std::fmt;
use std::path::PathBuf;

use notify::EventKind;
use notify::event::ModifyKind;

/// A filesystem notification classified for the scheduler.
///
/// Only `Write` and `Create` feed the debounce machinery; `Remove` and
/// `Rename` are informational, and `Error` carries a notification-channel
/// failure that is reported without affecting scheduling state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// The watched file's contents were modified.
    Write(PathBuf),
    /// The watched file was created.
    Create(PathBuf),
    /// The watched file was removed.
    Remove(PathBuf),
    /// The watched file was renamed.
    ///
    /// Some notification backends lose the subscription when a file is
    /// replaced via atomic rename; see the crate-level limitations note.
    Rename(PathBuf),
    /// The watch backend reported an error.
    Error(String),
}

impl FileEvent {
    /// Classify a raw notify event, dropping kinds with no reload
    /// significance (metadata access and the like).
    pub(crate) fn classify(event: &notify::Event) -> Option<Self> {
        let path = event.paths.first().cloned().unwrap_or_default();
        match event.kind {
            EventKind::Create(_) => Some(Self::Create(path)),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename(path)),
            EventKind::Modify(_) => Some(Self::Write(path)),
            EventKind::Remove(_) => Some(Self::Remove(path)),
            _ => None,
        }
    }

    /// Whether this event should feed the debounced reload path.
    #[must_use]
    pub fn triggers_reload(&self) -> bool {
        matches!(self, Self::Write(_) | Self::Create(_))
    }
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(p) => write!(f, "write: {}", p.display()),
            Self::Create(p) => write!(f, "create: {}", p.display()),
            Self::Remove(p) => write!(f, "remove: {}", p.display()),
            Self::Rename(p) => write!(f, "rename: {}", p.display()),
            Self::Error(message) => write!(f, "watch error: {message}"),
        }
    }
}
