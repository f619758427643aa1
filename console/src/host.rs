//! Host services for the terminal binary
//!
//! A terminal has no address bar and no toasts: navigation is an in-memory
//! history stack and notifications become log events.

use backoffice_core::environment::{Navigator, Notification, NotificationKind, Notifier};
use backoffice_core::location::Location;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory browser-like history
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: Mutex<Vec<Location>>,
}

impl HistoryNavigator {
    /// History holding a single entry
    #[must_use]
    pub fn new(initial: Location) -> Self {
        Self {
            entries: Mutex::new(vec![initial]),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Location>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of history entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the history is empty (never, after construction)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drop the current entry and return the one below it, like a back button
    pub fn back(&self) -> Option<Location> {
        let mut entries = self.entries();
        if entries.len() < 2 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn current(&self) -> Location {
        self.entries().last().cloned().unwrap_or_default()
    }

    fn push(&self, location: Location) {
        tracing::debug!(%location, "history push");
        self.entries().push(location);
    }

    fn replace(&self, location: Location) {
        tracing::debug!(%location, "history replace");
        let mut entries = self.entries();
        match entries.last_mut() {
            Some(current) => *current = location,
            None => entries.push(location),
        }
    }
}

/// Notifier that writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(message = %notification.message, "notification"),
            NotificationKind::Warning => tracing::warn!(message = %notification.message, "notification"),
            NotificationKind::Error => tracing::error!(message = %notification.message, "notification"),
        }
    }
}
