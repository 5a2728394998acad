//! Route guarding as a pure decision over the auth snapshot.
//!
//! The caller supplies where the user is and where they came from; the guard
//! answers with a [`NavigationIntent`] instead of navigating itself.

use serde::Serialize;

use crate::auth::AuthState;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_auth_checked: bool,
    pub is_authenticated: bool,
}

impl From<&AuthState> for AuthSnapshot {
    fn from(state: &AuthState) -> Self {
        Self {
            is_auth_checked: state.is_auth_checked,
            is_authenticated: state.is_authenticated(),
        }
    }
}

/// The route being entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Route the user was bounced from on their way to a guest-only page.
    pub from: Option<String>,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            from: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum NavigationIntent {
    RenderChildren,
    RenderLoading,
    /// Send the user to [`LOGIN_PATH`], remembering where to return.
    RedirectToLogin { from: String },
    Redirect { to: String },
}

/// Decide what a guarded route should do.
///
/// * `requires_guest` — the route is only for signed-out users (login,
///   registration, password recovery).
pub fn guard(auth: AuthSnapshot, requires_guest: bool, location: &Location) -> NavigationIntent {
    if !auth.is_auth_checked {
        return NavigationIntent::RenderLoading;
    }

    match (requires_guest, auth.is_authenticated) {
        (true, true) => NavigationIntent::Redirect {
            to: location
                .from
                .clone()
                .unwrap_or_else(|| HOME_PATH.to_string()),
        },
        (false, false) => NavigationIntent::RedirectToLogin {
            from: location.pathname.clone(),
        },
        _ => NavigationIntent::RenderChildren,
    }
}
