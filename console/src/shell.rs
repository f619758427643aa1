//! Console shell: store, environment and the unauthorized listener
//!
//! The [`Console`] is the session-owning top-level component. It restores
//! the persisted session, builds the store, and subscribes to the API
//! client's unauthorized signal so that a 401 from any call ends the session
//! exactly once, whoever made the call.

use crate::app::{ConsoleAction, ConsoleReducer, ConsoleState};
use crate::environment::ConsoleEnvironment;
use crate::slices::auth::{LANGUAGE_KEY, SessionState};
use backoffice_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// The console store
pub type ConsoleStore = Store<ConsoleState, ConsoleAction, ConsoleEnvironment, ConsoleReducer>;

/// A running console
pub struct Console {
    store: ConsoleStore,
    listener: JoinHandle<()>,
}

impl Console {
    /// Restore the session and locale from storage and start listening for 401s
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(env: ConsoleEnvironment) -> Self {
        let session = SessionState::restore(env.storage.as_ref());
        if let Some(token) = &session.token {
            env.credentials.set_token(token.clone());
        }

        let locale = match env.storage.get(LANGUAGE_KEY) {
            Ok(Some(locale)) if !locale.trim().is_empty() => locale,
            Ok(_) => env.settings.default_locale.clone(),
            Err(error) => {
                tracing::warn!(%error, "Could not read stored locale");
                env.settings.default_locale.clone()
            },
        };
        env.credentials.set_locale(locale.clone());

        tracing::info!(
            authenticated = session.is_authenticated(),
            %locale,
            "Console starting"
        );

        let unauthorized = env.api.subscribe_unauthorized();
        let store = Store::new(ConsoleState::new(session, locale), ConsoleReducer::new(), env);
        let listener = tokio::spawn(listen_for_unauthorized(store.clone(), unauthorized));

        Self { store, listener }
    }

    /// Route to whatever the host currently shows
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Console::shutdown`].
    pub async fn start(&self) -> Result<EffectHandle, StoreError> {
        let location = self.store.environment().navigator.current();
        self.store.send(ConsoleAction::LocationChanged(location)).await
    }

    /// Send an action
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Console::shutdown`].
    pub async fn send(&self, action: ConsoleAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Send an action and track every follow-up it causes
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Console::shutdown`].
    pub async fn send_and_settle(&self, action: ConsoleAction) -> Result<EffectHandle, StoreError> {
        self.store.send_and_settle(action).await
    }

    /// Read the state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&ConsoleState) -> T,
    {
        self.store.state(f).await
    }

    /// Snapshot of the whole state
    pub async fn snapshot(&self) -> ConsoleState {
        self.store.state(Clone::clone).await
    }

    /// Wait until no effect is running
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if work is still running after `timeout`.
    pub async fn wait_until_idle(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.wait_until_idle(timeout).await
    }

    /// Observe every applied action
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<ConsoleAction> {
        self.store.subscribe_actions()
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &ConsoleStore {
        &self.store
    }

    /// Stop the listener and drain running effects
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects outlive `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.listener.abort();
        self.store.shutdown(timeout).await
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("pending_effects", &self.store.pending_effects())
            .finish_non_exhaustive()
    }
}

async fn listen_for_unauthorized(
    store: ConsoleStore,
    mut signal: broadcast::Receiver<backoffice_client::Unauthorized>,
) {
    loop {
        match signal.recv().await {
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                if let Err(error) = store.send(ConsoleAction::Unauthorized).await {
                    tracing::debug!(%error, "Unauthorized signal arrived during shutdown");
                    return;
                }
            },
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}
