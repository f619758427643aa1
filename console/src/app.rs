//! Root reducer of the console
//!
//! Owns routing and the session lifecycle, and embeds the page reducers.
//! Every navigation goes through the session gate; entering a view mounts
//! its controller and leaving a list view unmounts it.

use crate::controllers::{
    OrdersPageAction, OrdersPageReducer, OrdersState, ProductsPageAction, ProductsPageReducer,
    ProductsState,
};
use crate::dashboard::{DashboardAction, DashboardReducer, DashboardState};
use crate::environment::ConsoleEnvironment;
use crate::gate::{GateDecision, guard};
use crate::route::Route;
use crate::slices::auth::{AuthAction, AuthReducer, LANGUAGE_KEY, SessionState};
use backoffice_client::{ApiError, AuthResponse, LoginRequest};
use backoffice_core::composition::reduce_scoped;
use backoffice_core::environment::Notification;
use backoffice_core::location::Location;
use backoffice_core::{Effect, Reducer, SmallVec, smallvec};
use std::fmt;
use std::sync::Arc;

/// Whole console state
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleState {
    /// View on screen; `None` until the first navigation
    pub route: Option<Route>,
    /// Location on screen
    pub location: Location,
    /// UI locale
    pub locale: String,
    /// Auth slice
    pub session: SessionState,
    /// Products page
    pub products: ProductsState,
    /// Orders page
    pub orders: OrdersState,
    /// Dashboard
    pub dashboard: DashboardState,
}

impl ConsoleState {
    /// Initial state for a restored (or anonymous) session
    #[must_use]
    pub fn new(session: SessionState, locale: impl Into<String>) -> Self {
        Self {
            route: None,
            location: Location::default(),
            locale: locale.into(),
            session,
            products: ProductsState::default(),
            orders: OrdersState::default(),
            dashboard: DashboardState::default(),
        }
    }
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new(SessionState::default(), "uz")
    }
}

/// Login form contents; the password never appears in logs
#[derive(Clone, PartialEq, Eq)]
pub struct LoginForm {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

impl LoginForm {
    /// Form with both fields filled
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything the console reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleAction {
    /// The operator asked to go somewhere
    Navigate(Location),
    /// The host now shows this location (start-up, back / forward)
    LocationChanged(Location),
    /// Submit the login form
    Login(LoginForm),
    /// The login request finished
    LoginCompleted(Result<AuthResponse, ApiError>),
    /// Sign out
    Logout,
    /// Some API call answered 401
    Unauthorized,
    /// Switch the UI locale
    SetLocale(String),
    /// Auth slice
    Auth(AuthAction),
    /// Products page
    Products(ProductsPageAction),
    /// Orders page
    Orders(OrdersPageAction),
    /// Dashboard
    Dashboard(DashboardAction),
}

type Effects = SmallVec<[Effect<ConsoleAction>; 4]>;

/// Root reducer
#[derive(Debug, Clone, Default)]
pub struct ConsoleReducer {
    auth: AuthReducer,
    products: ProductsPageReducer,
    orders: OrdersPageReducer,
    dashboard: DashboardReducer,
}

impl ConsoleReducer {
    /// Create the reducer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn auth(&self, state: &mut ConsoleState, action: AuthAction, env: &ConsoleEnvironment) -> Effects {
        reduce_scoped(&self.auth, &mut state.session, action, env, ConsoleAction::Auth)
    }

    fn products(
        &self,
        state: &mut ConsoleState,
        action: ProductsPageAction,
        env: &ConsoleEnvironment,
    ) -> Effects {
        reduce_scoped(&self.products, &mut state.products, action, env, ConsoleAction::Products)
    }

    fn orders(
        &self,
        state: &mut ConsoleState,
        action: OrdersPageAction,
        env: &ConsoleEnvironment,
    ) -> Effects {
        state.orders.viewer = state.session.role().cloned();
        reduce_scoped(&self.orders, &mut state.orders, action, env, ConsoleAction::Orders)
    }

    fn dashboard(
        &self,
        state: &mut ConsoleState,
        action: DashboardAction,
        env: &ConsoleEnvironment,
    ) -> Effects {
        reduce_scoped(&self.dashboard, &mut state.dashboard, action, env, ConsoleAction::Dashboard)
    }

    /// Route to `requested`
    ///
    /// `external` is true when the host already shows `requested`: a gate
    /// redirect then rewrites the current entry instead of adding one.
    fn navigate(
        &self,
        state: &mut ConsoleState,
        requested: Location,
        external: bool,
        env: &ConsoleEnvironment,
    ) -> Effects {
        let route = Route::of(&requested);
        let target = match guard(&requested, &state.session, route.required_role()) {
            GateDecision::Allow => route.location().with_query_params(requested.query.clone()),
            GateDecision::Redirect(location) => {
                tracing::debug!(from = %requested, to = %location, "Navigation redirected");
                location
            },
        };
        let route = Route::of(&target);

        let mut effects = Effects::new();
        if external {
            if target != requested {
                effects.push(env.replace_location(target.clone()));
            }
        } else if state.route != Some(route) || state.location != target {
            effects.push(env.push_location(target.clone()));
        }

        let previous = state.route.replace(route);
        state.location = target.clone();

        if previous == Some(route) {
            // same view, only the query may have changed
            match route {
                Route::Products => effects.extend(self.products(
                    state,
                    ProductsPageAction::UrlChanged(target.query),
                    env,
                )),
                Route::Orders => effects.extend(self.orders(
                    state,
                    OrdersPageAction::UrlChanged(target.query),
                    env,
                )),
                _ => {},
            }
            return effects;
        }

        match previous {
            Some(Route::Products) => effects.extend(self.products(state, ProductsPageAction::Unmount, env)),
            Some(Route::Orders) => effects.extend(self.orders(state, OrdersPageAction::Unmount, env)),
            Some(Route::ProductDetail(_)) => {
                effects.extend(self.products(state, ProductsPageAction::CloseDetail, env));
            },
            Some(Route::OrderDetail(_)) => {
                effects.extend(self.orders(state, OrdersPageAction::CloseDetail, env));
            },
            _ => {},
        }

        tracing::info!(route = %route, "Entering view");
        match route {
            Route::Login => {},
            Route::Dashboard => effects.extend(self.dashboard(state, DashboardAction::Load, env)),
            Route::Products => effects.extend(self.products(
                state,
                ProductsPageAction::Mount(target.query),
                env,
            )),
            Route::Orders => effects.extend(self.orders(
                state,
                OrdersPageAction::Mount(target.query),
                env,
            )),
            Route::ProductDetail(id) => {
                effects.extend(self.products(state, ProductsPageAction::ShowDetail(id), env));
            },
            Route::OrderDetail(id) => {
                effects.extend(self.orders(state, OrdersPageAction::ShowDetail(id), env));
            },
        }
        effects
    }

    /// Keep `state.location` on the query a list page last wrote to the URL
    fn follow_list_url(state: &mut ConsoleState) {
        let Some(route) = state.route.filter(|route| route.is_list()) else {
            return;
        };
        let url = if route == Route::Products {
            &state.products.list.url
        } else {
            &state.orders.list.url
        };
        state.location = route.location().with_query_params(url.to_query());
    }

    fn login_succeeded(
        &self,
        state: &mut ConsoleState,
        response: AuthResponse,
        env: &ConsoleEnvironment,
    ) -> Effects {
        let user = response.user();
        let persisted = self.auth(
            state,
            AuthAction::SetUser {
                token: response.token,
                user,
            },
            env,
        );

        // the token must be installed before the dashboard fetches
        smallvec![Effect::chain(vec![
            Effect::merge(persisted.into_vec()),
            env.notify(Notification::success(env.t("auth.loginSuccess"))),
            Effect::future(async { Some(ConsoleAction::Navigate(Route::Dashboard.location())) }),
        ])]
    }

    fn end_session(&self, state: &mut ConsoleState, env: &ConsoleEnvironment) -> Effects {
        let mut effects = self.auth(state, AuthAction::Logout, env);
        effects.extend(self.navigate(state, Route::Login.location(), false, env));
        effects
    }
}

impl Reducer for ConsoleReducer {
    type State = ConsoleState;
    type Action = ConsoleAction;
    type Environment = ConsoleEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ConsoleAction::Navigate(location) => self.navigate(state, location, false, env),
            ConsoleAction::LocationChanged(location) => self.navigate(state, location, true, env),
            ConsoleAction::Login(form) => {
                if form.username.trim().is_empty() || form.password.is_empty() {
                    return self.auth(state, AuthAction::SetError(env.t("auth.requiredFields")), env);
                }
                let mut effects = self.auth(state, AuthAction::SetLoading, env);
                let api = Arc::clone(&env.api);
                effects.push(Effect::future(async move {
                    let request = LoginRequest {
                        username: form.username,
                        password: form.password,
                    };
                    Some(ConsoleAction::LoginCompleted(api.login(request).await))
                }));
                effects
            },
            ConsoleAction::LoginCompleted(Ok(response)) => {
                self.login_succeeded(state, response, env)
            },
            ConsoleAction::LoginCompleted(Err(error)) => {
                tracing::warn!(%error, "Login failed");
                let message = error
                    .server_message()
                    .map_or_else(|| env.t("auth.loginFailed"), str::to_owned);
                let mut effects = self.auth(state, AuthAction::SetError(message.clone()), env);
                effects.push(env.notify(Notification::error(message)));
                effects
            },
            ConsoleAction::Logout => self.end_session(state, env),
            ConsoleAction::Unauthorized => {
                if state.session.is_authenticated() {
                    tracing::warn!("Session rejected by the server, signing out");
                    let mut effects = self.end_session(state, env);
                    effects.push(env.notify(Notification::warning(env.t("auth.sessionExpired"))));
                    effects
                } else if state.route.is_some_and(|route| route != Route::Login) {
                    self.navigate(state, Route::Login.location(), false, env)
                } else {
                    SmallVec::new()
                }
            },
            ConsoleAction::SetLocale(locale) => {
                if locale.trim().is_empty() || locale == state.locale {
                    return SmallVec::new();
                }
                state.locale.clone_from(&locale);
                let credentials = Arc::clone(&env.credentials);
                let storage = Arc::clone(&env.storage);
                smallvec![Effect::fire_and_forget(move || {
                    credentials.set_locale(locale.clone());
                    if let Err(error) = storage.set(LANGUAGE_KEY, &locale) {
                        tracing::warn!(%error, "Locale will not survive a restart");
                    }
                })]
            },
            ConsoleAction::Auth(action) => self.auth(state, action, env),
            ConsoleAction::Products(action) => {
                let effects = self.products(state, action, env);
                Self::follow_list_url(state);
                effects
            },
            ConsoleAction::Orders(action) => {
                let effects = self.orders(state, action, env);
                Self::follow_list_url(state);
                effects
            },
            ConsoleAction::Dashboard(action) => self.dashboard(state, action, env),
        }
    }
}
