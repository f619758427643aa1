//! Session gate
//!
//! Evaluated on every navigation. A view is wrapped by [`guard`] together
//! with the role it requires (usually none); the decision is never cached.

use crate::route::Route;
use crate::slices::auth::SessionState;
use backoffice_client::Role;
use backoffice_core::location::Location;

/// Outcome of guarding a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the requested view
    Allow,
    /// Show this location instead
    Redirect(Location),
}

/// Decide whether `location` may be shown to `session`
///
/// - `/login` is open, but a signed-in user is sent to the dashboard
/// - without a session every other view redirects to `/login`
/// - a session lacking `required_role` is sent to the dashboard
#[must_use]
pub fn guard(
    location: &Location,
    session: &SessionState,
    required_role: Option<&Role>,
) -> GateDecision {
    let route = Route::of(location);

    if route.is_public() {
        return if session.is_authenticated() {
            GateDecision::Redirect(Route::Dashboard.location())
        } else {
            GateDecision::Allow
        };
    }

    if !session.is_authenticated() {
        return GateDecision::Redirect(Route::Login.location());
    }

    match required_role {
        Some(role) if session.role() != Some(role) => {
            tracing::debug!(%role, path = %location.path, "Role mismatch, redirecting");
            GateDecision::Redirect(Route::Dashboard.location())
        },
        _ => GateDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_client::User;

    fn signed_in(role: &str) -> SessionState {
        SessionState {
            user: Some(User {
                username: "ali".to_string(),
                email: "ali@example.com".to_string(),
                role: Role(role.to_string()),
            }),
            token: Some("t".to_string()),
            ..SessionState::default()
        }
    }

    #[test]
    fn anonymous_visitors_are_sent_to_login() {
        let decision = guard(&Location::new("/orders"), &SessionState::default(), None);
        assert_eq!(decision, GateDecision::Redirect(Location::new("/login")));
    }

    #[test]
    fn login_is_open_to_anonymous_visitors() {
        let decision = guard(&Location::new("/login"), &SessionState::default(), None);
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn signed_in_user_skips_login() {
        let decision = guard(&Location::new("/login"), &signed_in("ADMIN"), None);
        assert_eq!(decision, GateDecision::Redirect(Location::new("/dashboard")));
    }

    #[test]
    fn role_mismatch_lands_on_dashboard() {
        let admin = Role::admin();
        let location = Location::new("/products");

        assert_eq!(guard(&location, &signed_in("ADMIN"), Some(&admin)), GateDecision::Allow);
        assert_eq!(
            guard(&location, &signed_in("USER"), Some(&admin)),
            GateDecision::Redirect(Location::new("/dashboard"))
        );
    }
}
