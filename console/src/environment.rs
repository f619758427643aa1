//! Injected dependencies for console reducers

use crate::config::ConsoleConfig;
use backoffice_client::{ApiError, BackOfficeApi, Credentials};
use backoffice_core::Effect;
use backoffice_core::environment::{
    KeyValueStorage, Navigator, Notification, Notifier, Translator,
};
use backoffice_core::location::Location;
use std::sync::Arc;
use std::time::Duration;

/// Tunables that shape reducer behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Quiet interval for search / category input
    pub debounce: Duration,
    /// Records per list page
    pub page_size: u32,
    /// Buttons in the pagination control
    pub max_visible_pages: u32,
    /// Locale used when none is stored
    pub default_locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&ConsoleConfig::default())
    }
}

impl From<&ConsoleConfig> for Settings {
    fn from(config: &ConsoleConfig) -> Self {
        Self {
            debounce: config.debounce,
            page_size: config.page_size.max(1),
            max_visible_pages: config.max_visible_pages,
            default_locale: config.default_locale.clone(),
        }
    }
}

/// Everything a console reducer may reach outside its own state
#[derive(Clone)]
pub struct ConsoleEnvironment {
    /// Remote back office
    pub api: Arc<dyn BackOfficeApi>,
    /// Token and locale shared with the API client
    pub credentials: Arc<Credentials>,
    /// Host history
    pub navigator: Arc<dyn Navigator>,
    /// Host toasts
    pub notifier: Arc<dyn Notifier>,
    /// Durable storage for the session and locale
    pub storage: Arc<dyn KeyValueStorage>,
    /// Message catalog
    pub translator: Arc<dyn Translator>,
    /// Tunables
    pub settings: Settings,
}

impl ConsoleEnvironment {
    /// Translate `key` in the current locale
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translator.translate(&self.credentials.locale(), key)
    }

    /// Server message of `error`, else the generic localized error
    #[must_use]
    pub fn failure_message(&self, error: &ApiError) -> String {
        error
            .server_message()
            .map_or_else(|| self.t("common.error"), str::to_owned)
    }

    /// Show a notification once effects run
    #[must_use]
    pub fn notify<A: Send + 'static>(&self, notification: Notification) -> Effect<A> {
        let notifier = Arc::clone(&self.notifier);
        Effect::fire_and_forget(move || notifier.notify(notification))
    }

    /// Notify a failure unless it was a 401, which the session teardown reports
    #[must_use]
    pub fn notify_failure<A: Send + 'static>(&self, error: &ApiError) -> Effect<A> {
        if error.is_unauthorized() {
            Effect::None
        } else {
            self.notify(Notification::error(self.failure_message(error)))
        }
    }

    /// Rewrite the current history entry
    #[must_use]
    pub fn replace_location<A: Send + 'static>(&self, location: Location) -> Effect<A> {
        let navigator = Arc::clone(&self.navigator);
        Effect::fire_and_forget(move || navigator.replace(location))
    }

    /// Add a history entry
    #[must_use]
    pub fn push_location<A: Send + 'static>(&self, location: Location) -> Effect<A> {
        let navigator = Arc::clone(&self.navigator);
        Effect::fire_and_forget(move || navigator.push(location))
    }
}

impl std::fmt::Debug for ConsoleEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleEnvironment")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
