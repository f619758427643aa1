//! # Back Office Console
//!
//! Headless core of an e-commerce back-office admin console.
//!
//! The console keeps three normalized slices (session, products, orders) in
//! a single [`backoffice_runtime::Store`] and drives them from reducers:
//!
//! - [`slices`]: the session and the two paginated collections
//! - [`controllers`]: list pages reconciling URL query, debounced filters and fetches
//! - [`pagination`]: the page-button window of a pagination control
//! - [`gate`]: the session gate run on every navigation
//! - [`form`]: product create / edit form with validation
//! - [`dashboard`]: summary statistics
//! - [`app`]: the root reducer, routing and the login flow
//! - [`shell`]: the [`Console`] wiring the store to the API client's unauthorized signal
//!
//! Rendering is left to the host; it reads state snapshots and sends
//! [`ConsoleAction`]s.
//!
//! ## Example
//!
//! ```ignore
//! let console = Console::new(environment);
//! console.start().await?;
//! console.send(ConsoleAction::Products(ProductsPageAction::SearchChanged("tea".into()))).await?;
//! console.wait_until_idle(Duration::from_secs(5)).await?;
//!
//! let names = console.state(|s| s.products.slice.items.iter().map(|p| p.name.clone()).collect::<Vec<_>>()).await;
//! ```

pub mod app;
pub mod config;
pub mod controllers;
pub mod dashboard;
pub mod environment;
pub mod form;
pub mod gate;
pub mod host;
pub mod i18n;
pub mod pagination;
pub mod route;
pub mod shell;
pub mod slices;
pub mod storage;

pub use app::{ConsoleAction, ConsoleReducer, ConsoleState, LoginForm};
pub use config::{ConfigError, ConsoleConfig};
pub use environment::{ConsoleEnvironment, Settings};
pub use route::Route;
pub use shell::Console;
