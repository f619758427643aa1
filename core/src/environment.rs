//! Environment module - host services injected into reducers
//!
//! The console never talks to a browser, a terminal or a toast library
//! directly. Everything outside the core is reached through these traits so
//! production hosts and tests can supply their own implementations.

use crate::location::Location;
use thiserror::Error;

/// Navigation history owned by the host (browser history, router, CLI shell)
///
/// # Examples
///
/// ```ignore
/// // Read the query string the page was opened with
/// let page = env.navigator.current().query.get_parsed::<u32>("page");
///
/// // Rewrite the query without adding a history entry
/// env.navigator.replace(Location::new("/products").with_query("page", "2"));
/// ```
pub trait Navigator: Send + Sync {
    /// The location currently shown by the host
    fn current(&self) -> Location;

    /// Navigate to a new location, adding a history entry
    fn push(&self, location: Location);

    /// Replace the current location without adding a history entry
    fn replace(&self, location: Location);
}

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation succeeded
    Success,
    /// Operation succeeded with caveats
    Warning,
    /// Operation failed
    Error,
}

/// A transient message shown to the operator (toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub kind: NotificationKind,
    /// Already-localized text
    pub message: String,
}

impl Notification {
    /// Create a success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// Create a warning notification
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            message: message.into(),
        }
    }

    /// Create an error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Notification display owned by the host
pub trait Notifier: Send + Sync {
    /// Show a transient notification
    fn notify(&self, notification: Notification);
}

/// Errors raised by durable key-value storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium could not be read or written
    #[error("Storage I/O failed: {0}")]
    Io(String),

    /// Stored data could not be decoded
    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),
}

/// Durable key-value storage that survives restarts (local storage)
pub trait KeyValueStorage: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Message catalog lookup owned by the host
pub trait Translator: Send + Sync {
    /// Translate `key` for `locale`, falling back to the key itself when unknown
    fn translate(&self, locale: &str, key: &str) -> String;
}
