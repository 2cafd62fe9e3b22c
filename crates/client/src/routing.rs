//! Route table and session guard.
//!
//! The guard only reacts to identity transitions: signing in lands on the
//! clients tab, signing out lands on the sign-in screen. It does not close
//! subscriptions; screens are torn down by their owner (see
//! [`crate::shell`]).

use core::fmt;

use tracing::debug;

use teckadm_core::OwnerId;

use crate::auth::Identity;

/// Screens reachable in the app.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Spinner shown until the first identity value is known.
    Loading,
    SignIn,
    SignUp,
    Dashboard,
    Clients,
    Tickets,
    Quotes,
    /// Any path not in the table.
    NotFound(String),
}

impl Route {
    /// Tabs in display order.
    pub const TABS: [Self; 4] = [Self::Dashboard, Self::Clients, Self::Tickets, Self::Quotes];

    /// Parse a path. Unknown paths map to [`Route::NotFound`].
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Self::Loading,
            "/(auth)/sign-in" | "/sign-in" => Self::SignIn,
            "/(auth)/sign-up" | "/sign-up" => Self::SignUp,
            "/(tabs)" | "/dashboard" => Self::Dashboard,
            "/clientes" => Self::Clients,
            "/incidencias" => Self::Tickets,
            "/cotizaciones" => Self::Quotes,
            other => Self::NotFound(other.to_owned()),
        }
    }

    /// Canonical path.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Loading => "/",
            Self::SignIn => "/(auth)/sign-in",
            Self::SignUp => "/(auth)/sign-up",
            Self::Dashboard => "/(tabs)",
            Self::Clients => "/clientes",
            Self::Tickets => "/incidencias",
            Self::Quotes => "/cotizaciones",
            Self::NotFound(path) => path,
        }
    }

    /// Whether the screen needs a signed-in identity.
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Clients | Self::Tickets | Self::Quotes
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Keeps the current route consistent with the session.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    route: Route,
    owner: Option<OwnerId>,
}

impl RouteGuard {
    /// Start on the loading screen.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            route: Route::Loading,
            owner: None,
        }
    }

    /// Current route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Apply an identity value and return the resulting route.
    ///
    /// A new owner (sign-in or account switch) redirects to the clients tab;
    /// losing the identity redirects to sign-in. Repeated values for the same
    /// owner leave the route alone, as does staying signed out on an auth
    /// screen.
    pub fn on_identity(&mut self, identity: Option<&Identity>) -> &Route {
        let owner = identity.map(|id| id.uid.clone());
        let first = self.route == Route::Loading;

        match (&owner, first || owner != self.owner) {
            (Some(_), true) => self.redirect(Route::Clients),
            (None, true) => self.redirect(Route::SignIn),
            (None, false) if self.route.requires_session() => self.redirect(Route::SignIn),
            _ => {}
        }

        self.owner = owner;
        &self.route
    }

    /// Navigate to `route`, unless it needs a session the user does not
    /// have, in which case the guard sends them to sign-in.
    pub fn navigate(&mut self, route: Route) -> &Route {
        if route.requires_session() && self.owner.is_none() {
            self.redirect(Route::SignIn);
        } else {
            self.route = route;
        }
        &self.route
    }

    fn redirect(&mut self, route: Route) {
        if self.route != route {
            debug!(from = %self.route, to = %route, "Redirect");
            self.route = route;
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use teckadm_core::Email;

    use super::*;

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: OwnerId::new(uid),
            email: Email::parse("ana@taller.mx").unwrap(),
            display_name: None,
        }
    }

    #[test]
    fn test_first_value_leaves_loading() {
        let mut guard = RouteGuard::new();
        assert_eq!(guard.on_identity(None), &Route::SignIn);

        let mut guard = RouteGuard::new();
        assert_eq!(guard.on_identity(Some(&identity("U1"))), &Route::Clients);
    }

    #[test]
    fn test_sign_in_then_out() {
        let mut guard = RouteGuard::new();
        guard.on_identity(None);
        guard.navigate(Route::SignUp);

        assert_eq!(guard.on_identity(Some(&identity("U1"))), &Route::Clients);
        guard.navigate(Route::Quotes);

        // Same owner again: stay put.
        assert_eq!(guard.on_identity(Some(&identity("U1"))), &Route::Quotes);

        assert_eq!(guard.on_identity(None), &Route::SignIn);
    }

    #[test]
    fn test_signed_out_cannot_open_tabs() {
        let mut guard = RouteGuard::new();
        guard.on_identity(None);
        guard.navigate(Route::SignUp);
        assert_eq!(guard.on_identity(None), &Route::SignUp);
        assert_eq!(guard.navigate(Route::Tickets), &Route::SignIn);
    }

    #[test]
    fn test_paths() {
        assert_eq!(Route::from_path("/clientes/"), Route::Clients);
        assert_eq!(Route::from_path("/(auth)/sign-up"), Route::SignUp);
        assert_eq!(
            Route::from_path("/facturas"),
            Route::NotFound("/facturas".to_owned())
        );
        for tab in Route::TABS {
            assert_eq!(Route::from_path(tab.path()), tab);
        }
    }
}
