//! Navigable views

use backoffice_client::Role;
use backoffice_core::location::Location;
use std::fmt;

/// A view the console can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/login`
    Login,
    /// `/dashboard`
    Dashboard,
    /// `/products`
    Products,
    /// `/products/:id`
    ProductDetail(i64),
    /// `/orders`
    Orders,
    /// `/orders/:id`
    OrderDetail(i64),
}

impl Route {
    /// Resolve a path; `/` and anything unknown land on the dashboard
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["login"] => Self::Login,
            ["products"] => Self::Products,
            ["products", id] => id.parse().map_or(Self::Dashboard, Self::ProductDetail),
            ["orders"] => Self::Orders,
            ["orders", id] => id.parse().map_or(Self::Dashboard, Self::OrderDetail),
            _ => Self::Dashboard,
        }
    }

    /// Resolve the path of `location`
    #[must_use]
    pub fn of(location: &Location) -> Self {
        Self::resolve(&location.path)
    }

    /// Canonical path
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Products => "/products".to_string(),
            Self::ProductDetail(id) => format!("/products/{id}"),
            Self::Orders => "/orders".to_string(),
            Self::OrderDetail(id) => format!("/orders/{id}"),
        }
    }

    /// Location of this route without a query
    #[must_use]
    pub fn location(self) -> Location {
        Location::new(self.path())
    }

    /// Role a session needs to see this view, beyond being signed in
    ///
    /// Every view of the console is open to any signed-in account.
    #[must_use]
    pub const fn required_role(self) -> Option<&'static Role> {
        None
    }

    /// Whether the view is reachable without a session
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Login)
    }

    /// Whether this is one of the paginated list views
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Products | Self::Orders)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
