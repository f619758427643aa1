//! Shared request credentials
//!
//! The bearer token and the UI locale are owned by the session layer but read
//! by the transport on every request. Both sides hold the same
//! `Arc<Credentials>`.

use std::sync::{PoisonError, RwLock};

/// Bearer token and locale attached to outgoing requests
#[derive(Debug)]
pub struct Credentials {
    token: RwLock<Option<String>>,
    locale: RwLock<String>,
}

impl Credentials {
    /// Create credentials with no token and the given locale
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(None),
            locale: RwLock::new(locale.into()),
        }
    }

    /// Current bearer token
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a bearer token for subsequent requests
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Stop sending a bearer token
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Locale sent as `Accept-Language`
    #[must_use]
    pub fn locale(&self) -> String {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the locale sent as `Accept-Language`
    pub fn set_locale(&self, locale: impl Into<String>) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.into();
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("uz")
    }
}
