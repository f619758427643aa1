//! Configuration management for the console.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparseable numbers fall back to their defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by [`ConsoleConfig::validate`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API base URL is not an http(s) URL
    #[error("BACKOFFICE_API_URL must start with http:// or https://, got {0:?}")]
    InvalidApiUrl(String),

    /// A page size of zero was configured
    #[error("BACKOFFICE_PAGE_SIZE must be at least 1")]
    InvalidPageSize,

    /// The default locale is empty
    #[error("BACKOFFICE_DEFAULT_LOCALE must not be empty")]
    EmptyLocale,
}

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the back-office REST API
    pub api_url: String,
    /// Locale used until the operator picks one
    pub default_locale: String,
    /// Ceiling for a single API request
    pub request_timeout: Duration,
    /// Quiet interval before search / category input takes effect
    pub debounce: Duration,
    /// Records per list page
    pub page_size: u32,
    /// Page buttons shown by the pagination control
    pub max_visible_pages: u32,
    /// File backing durable storage (session, locale)
    pub storage_path: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            api_url: lookup("BACKOFFICE_API_URL")
                .unwrap_or_else(|| "http://localhost:8080/api".to_string()),
            default_locale: lookup("BACKOFFICE_DEFAULT_LOCALE").unwrap_or_else(|| "uz".to_string()),
            request_timeout: Duration::from_secs(
                number("BACKOFFICE_REQUEST_TIMEOUT_SECS").unwrap_or(10),
            ),
            debounce: Duration::from_millis(number("BACKOFFICE_DEBOUNCE_MS").unwrap_or(500)),
            page_size: number("BACKOFFICE_PAGE_SIZE")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(10),
            max_visible_pages: number("BACKOFFICE_MAX_VISIBLE_PAGES")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(5),
            storage_path: lookup("BACKOFFICE_STORAGE_PATH")
                .map_or_else(|| PathBuf::from(".backoffice/storage.json"), PathBuf::from),
            log_filter: lookup("RUST_LOG")
                .unwrap_or_else(|| "backoffice=info,backoffice_console=info".to_string()),
        }
    }

    /// Check values that have no sensible fallback
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::EmptyLocale);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ConsoleConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_console_conventions() {
        let config = ConsoleConfig::default();
        assert_eq!(config.default_locale, "uz");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.max_visible_pages, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("BACKOFFICE_API_URL", "https://shop.example.com/api"),
            ("BACKOFFICE_DEBOUNCE_MS", "250"),
            ("BACKOFFICE_PAGE_SIZE", "25"),
        ]);
        assert_eq!(config.api_url, "https://shop.example.com/api");
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config(&[("BACKOFFICE_PAGE_SIZE", "lots"), ("BACKOFFICE_DEBOUNCE_MS", "-3")]);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.debounce, Duration::from_millis(500));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert_eq!(
            config(&[("BACKOFFICE_API_URL", "ftp://x")]).validate(),
            Err(ConfigError::InvalidApiUrl("ftp://x".to_string()))
        );
        assert_eq!(
            config(&[("BACKOFFICE_PAGE_SIZE", "0")]).validate(),
            Err(ConfigError::InvalidPageSize)
        );
    }
}
