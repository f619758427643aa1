//! Console wired to the in-memory backend and recording host mocks

#![allow(dead_code)] // each test binary uses a different subset

use backoffice_client::{Credentials, Role, User};
use backoffice_console::slices::auth::{AUTH_TOKEN_KEY, USER_KEY};
use backoffice_console::{Console, ConsoleAction, ConsoleEnvironment, ConsoleState, Settings};
use backoffice_core::location::Location;
use backoffice_testing::backend::InMemoryBackend;
use backoffice_testing::mocks::{InMemoryStorage, KeyTranslator, RecordingNavigator, RecordingNotifier};
use std::sync::Arc;
use std::time::Duration;

pub const DEBOUNCE: Duration = Duration::from_millis(500);
pub const PAGE_SIZE: u32 = 3;
pub const TOKEN: &str = "token-admin";

pub struct Harness {
    pub console: Console,
    pub backend: Arc<InMemoryBackend>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub storage: Arc<InMemoryStorage>,
    pub credentials: Arc<Credentials>,
}

pub fn admin() -> User {
    User {
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        role: Role::admin(),
    }
}

/// Storage holding a persisted admin session
pub fn signed_in_storage() -> InMemoryStorage {
    InMemoryStorage::new()
        .with_entry(AUTH_TOKEN_KEY, TOKEN)
        .with_entry(USER_KEY, &serde_json::to_string(&admin()).unwrap())
}

pub fn settings() -> Settings {
    Settings {
        debounce: DEBOUNCE,
        page_size: PAGE_SIZE,
        max_visible_pages: 5,
        default_locale: "en".to_string(),
    }
}

impl Harness {
    /// Console showing `at`, signed in as admin
    pub fn signed_in(backend: InMemoryBackend, at: &str) -> Self {
        Self::build(backend, signed_in_storage(), at)
    }

    /// Console showing `at` with no stored session
    pub fn anonymous(backend: InMemoryBackend, at: &str) -> Self {
        Self::build(backend, InMemoryStorage::new(), at)
    }

    pub fn build(backend: InMemoryBackend, storage: InMemoryStorage, at: &str) -> Self {
        let backend = Arc::new(backend);
        let navigator = Arc::new(RecordingNavigator::starting_at(at));
        let notifier = Arc::new(RecordingNotifier::new());
        let storage = Arc::new(storage);
        let credentials = Arc::new(Credentials::new("en"));

        let env = ConsoleEnvironment {
            api: backend.clone(),
            credentials: Arc::clone(&credentials),
            navigator: navigator.clone(),
            notifier: notifier.clone(),
            storage: storage.clone(),
            translator: Arc::new(KeyTranslator),
            settings: settings(),
        };

        Self {
            console: Console::new(env),
            backend,
            navigator,
            notifier,
            storage,
            credentials,
        }
    }

    /// Route to the host location and let every effect finish
    pub async fn start(&self) {
        self.console.start().await.unwrap();
        self.settle().await;
    }

    pub async fn send(&self, action: ConsoleAction) {
        self.console.send(action).await.unwrap();
        self.settle().await;
    }

    pub async fn navigate(&self, to: &str) {
        self.send(ConsoleAction::Navigate(Location::parse(to))).await;
    }

    /// Wait until no effect runs, including work queued by the unauthorized listener
    pub async fn settle(&self) {
        self.console.wait_until_idle(Duration::from_secs(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.console.wait_until_idle(Duration::from_secs(10)).await.unwrap();
    }

    /// Poll until `condition` holds
    pub async fn until(&self, condition: impl Fn(&Self) -> bool) {
        for _ in 0..1_000 {
            if condition(self) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("condition never held");
    }

    pub async fn state(&self) -> ConsoleState {
        self.console.snapshot().await
    }

    /// Names of the products on screen
    pub async fn product_names(&self) -> Vec<String> {
        self.console
            .state(|s| s.products.slice.items.iter().map(|p| p.name.clone()).collect())
            .await
    }

    /// Ids of the products on screen
    pub async fn product_ids(&self) -> Vec<i64> {
        self.console
            .state(|s| s.products.slice.items.iter().map(|p| p.id).collect())
            .await
    }
}
