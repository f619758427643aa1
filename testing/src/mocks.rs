//! Mock implementations of the host environment traits
//!
//! Each mock records what the console asked of it so tests can assert on
//! navigation history, shown notifications and storage writes.

use backoffice_core::environment::{
    KeyValueStorage, Navigator, Notification, NotificationKind, Notifier, StorageError,
    Translator,
};
use backoffice_core::location::Location;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A storage operation, as recorded by [`InMemoryStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    /// `set(key, value)`
    Set(String, String),
    /// `remove(key)`
    Remove(String),
}

/// Key-value storage held in memory
///
/// # Example
///
/// ```
/// use backoffice_testing::mocks::InMemoryStorage;
/// use backoffice_core::environment::KeyValueStorage;
///
/// let storage = InMemoryStorage::new().with_entry("language", "en");
/// assert_eq!(storage.get("language").unwrap().as_deref(), Some("en"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
    ops: Mutex<Vec<StorageOp>>,
}

impl InMemoryStorage {
    /// Create empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key (not recorded as an operation)
    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        self
    }

    /// Whether `key` currently holds a value
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.entries).contains_key(key)
    }

    /// Current value of `key`
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// Every write and removal, in order
    #[must_use]
    pub fn ops(&self) -> Vec<StorageOp> {
        lock(&self.ops).clone()
    }

    /// How many times `key` was removed
    #[must_use]
    pub fn removals_of(&self, key: &str) -> usize {
        lock(&self.ops)
            .iter()
            .filter(|op| matches!(op, StorageOp::Remove(k) if k == key))
            .count()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        lock(&self.ops).push(StorageOp::Set(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        lock(&self.ops).push(StorageOp::Remove(key.to_string()));
        Ok(())
    }
}

/// How a location reached the [`RecordingNavigator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOp {
    /// New history entry
    Push(Location),
    /// Current entry rewritten
    Replace(Location),
}

impl NavigationOp {
    /// The target location
    #[must_use]
    pub const fn location(&self) -> &Location {
        match self {
            Self::Push(location) | Self::Replace(location) => location,
        }
    }
}

/// Navigator that keeps a current location and records every change
#[derive(Debug)]
pub struct RecordingNavigator {
    current: Mutex<Location>,
    ops: Mutex<Vec<NavigationOp>>,
}

impl RecordingNavigator {
    /// Start at `initial` (e.g. `"/products?page=2"`)
    #[must_use]
    pub fn starting_at(initial: &str) -> Self {
        Self {
            current: Mutex::new(Location::parse(initial)),
            ops: Mutex::new(Vec::new()),
        }
    }

    /// Every push and replace, in order
    #[must_use]
    pub fn ops(&self) -> Vec<NavigationOp> {
        lock(&self.ops).clone()
    }

    /// Only the pushes
    #[must_use]
    pub fn pushes(&self) -> Vec<Location> {
        lock(&self.ops)
            .iter()
            .filter_map(|op| match op {
                NavigationOp::Push(location) => Some(location.clone()),
                NavigationOp::Replace(_) => None,
            })
            .collect()
    }

    /// Only the replaces
    #[must_use]
    pub fn replaces(&self) -> Vec<Location> {
        lock(&self.ops)
            .iter()
            .filter_map(|op| match op {
                NavigationOp::Replace(location) => Some(location.clone()),
                NavigationOp::Push(_) => None,
            })
            .collect()
    }

    /// Move without recording, as the host does on back / forward
    pub fn travel_to(&self, location: &str) -> Location {
        let location = Location::parse(location);
        *lock(&self.current) = location.clone();
        location
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::starting_at("/")
    }
}

impl Navigator for RecordingNavigator {
    fn current(&self) -> Location {
        lock(&self.current).clone()
    }

    fn push(&self, location: Location) {
        *lock(&self.current) = location.clone();
        lock(&self.ops).push(NavigationOp::Push(location));
    }

    fn replace(&self, location: Location) {
        *lock(&self.current) = location.clone();
        lock(&self.ops).push(NavigationOp::Replace(location));
    }
}

/// Notifier that records every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything shown so far
    #[must_use]
    pub fn shown(&self) -> Vec<Notification> {
        lock(&self.shown).clone()
    }

    /// Messages of a given kind
    #[must_use]
    pub fn messages(&self, kind: NotificationKind) -> Vec<String> {
        lock(&self.shown)
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.shown).push(notification);
    }
}

/// Translator that returns the message key itself
///
/// Keeps assertions independent of any catalog wording.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, _locale: &str, key: &str) -> String {
        key.to_string()
    }
}
