//! Auth slice: the signed-in session
//!
//! The token and the user profile are set and cleared together. Every change
//! is mirrored to durable storage and to the client credentials by effects, so
//! the reducer itself stays free of I/O.

use crate::environment::ConsoleEnvironment;
use backoffice_client::{Role, User};
use backoffice_core::environment::KeyValueStorage;
use backoffice_core::{Effect, Reducer, SmallVec, smallvec};
use std::sync::Arc;

/// Storage key of the bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key of the JSON user profile
pub const USER_KEY: &str = "user";

/// Storage key of the selected locale
pub const LANGUAGE_KEY: &str = "language";

/// Session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Signed-in profile; present iff `token` is
    pub user: Option<User>,
    /// Bearer token; present iff `user` is
    pub token: Option<String>,
    /// A login request is in flight
    pub loading: bool,
    /// Last login failure
    pub error: Option<String>,
}

impl SessionState {
    /// Whether a session exists
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// Role of the signed-in user
    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.user.as_ref().map(|user| &user.role)
    }

    /// Rebuild the session persisted in `storage`
    ///
    /// Both keys must be present and the profile must decode; anything less
    /// yields an anonymous session.
    #[must_use]
    pub fn restore(storage: &dyn KeyValueStorage) -> Self {
        let token = match storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token,
            Err(error) => {
                tracing::warn!(%error, "Could not read stored token");
                None
            },
        };
        let user = match storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(error) => {
                    tracing::warn!(%error, "Discarding corrupt stored user");
                    None
                },
            },
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "Could not read stored user");
                None
            },
        };

        match (token, user) {
            (Some(token), Some(user)) => Self {
                user: Some(user),
                token: Some(token),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

/// Actions of the auth slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// A login request started
    SetLoading,
    /// A session was established
    SetUser {
        /// Bearer token
        token: String,
        /// Profile
        user: User,
    },
    /// Login failed
    SetError(String),
    /// Tear the session down
    Logout,
    /// Dismiss the login error
    ClearError,
}

/// Reducer for [`SessionState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl AuthReducer {
    fn persist(env: &ConsoleEnvironment, token: String, user: &User) -> Effect<AuthAction> {
        let storage = Arc::clone(&env.storage);
        let credentials = Arc::clone(&env.credentials);
        let profile = serde_json::to_string(user);

        Effect::fire_and_forget(move || {
            credentials.set_token(token.clone());
            let profile = match profile {
                Ok(profile) => profile,
                Err(error) => {
                    tracing::error!(%error, "Could not encode user profile");
                    return;
                },
            };
            let written = storage
                .set(AUTH_TOKEN_KEY, &token)
                .and_then(|()| storage.set(USER_KEY, &profile));
            if let Err(error) = written {
                tracing::warn!(%error, "Session will not survive a restart");
            }
        })
    }

    fn forget(env: &ConsoleEnvironment) -> Effect<AuthAction> {
        let storage = Arc::clone(&env.storage);
        let credentials = Arc::clone(&env.credentials);

        Effect::fire_and_forget(move || {
            credentials.clear_token();
            for key in [AUTH_TOKEN_KEY, USER_KEY] {
                if let Err(error) = storage.remove(key) {
                    tracing::warn!(%error, key, "Could not remove stored session");
                }
            }
        })
    }
}

impl Reducer for AuthReducer {
    type State = SessionState;
    type Action = AuthAction;
    type Environment = ConsoleEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::SetLoading => {
                state.loading = true;
                state.error = None;
                SmallVec::new()
            },
            AuthAction::SetUser { token, user } => {
                tracing::info!(username = %user.username, "Session established");
                let effect = Self::persist(env, token.clone(), &user);
                *state = SessionState {
                    user: Some(user),
                    token: Some(token),
                    loading: false,
                    error: None,
                };
                smallvec![effect]
            },
            AuthAction::SetError(message) => {
                state.loading = false;
                state.error = Some(message);
                SmallVec::new()
            },
            AuthAction::Logout => {
                tracing::info!("Session cleared");
                *state = SessionState::default();
                smallvec![Self::forget(env)]
            },
            AuthAction::ClearError => {
                state.error = None;
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use backoffice_testing::mocks::InMemoryStorage;

    fn user() -> User {
        User {
            username: "ali".to_string(),
            email: "ali@example.com".to_string(),
            role: Role::admin(),
        }
    }

    #[test]
    fn restore_requires_both_keys() {
        let profile = serde_json::to_string(&user()).unwrap();

        let complete = InMemoryStorage::new()
            .with_entry(AUTH_TOKEN_KEY, "t")
            .with_entry(USER_KEY, &profile);
        let session = SessionState::restore(&complete);
        assert_eq!(session.token.as_deref(), Some("t"));
        assert_eq!(session.user, Some(user()));

        let token_only = InMemoryStorage::new().with_entry(AUTH_TOKEN_KEY, "t");
        assert_eq!(SessionState::restore(&token_only), SessionState::default());
    }

    #[test]
    fn corrupt_profile_restores_nothing() {
        let storage = InMemoryStorage::new()
            .with_entry(AUTH_TOKEN_KEY, "t")
            .with_entry(USER_KEY, "{not json");
        assert!(!SessionState::restore(&storage).is_authenticated());
    }
}
