//! # Auth slice
//!
//! Who is signed in, and whether that has been determined yet.
//!
//! `is_auth_checked` flips to `true` once any auth determination completes
//! (a user was loaded, or no credential was found). It only returns to
//! `false` on a rejected login or a failed auth check.
//!
//! Logout always ends with no user, whether or not the server
//! acknowledged it; a rejected logout additionally records its error.

use std::convert::Infallible;

use serde::Serialize;

use crate::lifecycle::Lifecycle;
use crate::store::Reducer;
use crate::types::User;

pub const REGISTER_FAILED: &str = "регистрация не удалась";
pub const LOGIN_FAILED: &str = "вход не удался";
pub const LOGOUT_FAILED: &str = "выход не удался";
pub const GET_USER_FAILED: &str = "загрузка пользователя не удалась";
pub const UPDATE_USER_FAILED: &str = "обновление пользователя не удалось";
pub const CHECK_AUTH_FAILED: &str = "пользователь не зарегистрирован";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_auth_checked: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Marks the auth determination as complete.
    AuthChecked,
    CheckAuth(Lifecycle<()>),
    Register(Lifecycle<User>),
    Login(Lifecycle<User>),
    Logout(Lifecycle<()>),
    GetUser(Lifecycle<User>),
    UpdateUser(Lifecycle<User>),
}

impl AuthAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthChecked => "user/authChecked",
            Self::CheckAuth(_) => "user/check",
            Self::Register(_) => "user/register",
            Self::Login(_) => "user/login",
            Self::Logout(_) => "user/logout",
            Self::GetUser(_) => "user/get",
            Self::UpdateUser(_) => "user/update",
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            Self::AuthChecked => None,
            Self::CheckAuth(l) | Self::Logout(l) => Some(l.phase()),
            Self::Register(l) | Self::Login(l) | Self::GetUser(l) | Self::UpdateUser(l) => {
                Some(l.phase())
            }
        }
    }
}

impl Reducer for AuthState {
    type Action = AuthAction;
    type Error = Infallible;

    fn reduce(&self, action: AuthAction) -> Result<Self, Infallible> {
        let mut next = self.clone();

        match action {
            AuthAction::AuthChecked => next.is_auth_checked = true,

            AuthAction::CheckAuth(Lifecycle::Pending)
            | AuthAction::Register(Lifecycle::Pending)
            | AuthAction::Login(Lifecycle::Pending)
            | AuthAction::Logout(Lifecycle::Pending)
            | AuthAction::GetUser(Lifecycle::Pending)
            | AuthAction::UpdateUser(Lifecycle::Pending) => next.is_loading = true,

            // The nested profile fetch records its own error; completing the
            // check leaves it visible but drops a stale check failure.
            AuthAction::CheckAuth(Lifecycle::Fulfilled(())) => {
                next.is_loading = false;
                next.is_auth_checked = true;
                if next.error.as_deref() == Some(CHECK_AUTH_FAILED) {
                    next.error = None;
                }
            }
            AuthAction::CheckAuth(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.is_auth_checked = false;
                next.error = Some(CHECK_AUTH_FAILED.to_string());
            }

            AuthAction::Register(Lifecycle::Fulfilled(user)) => {
                next.is_loading = false;
                next.user = Some(user);
                next.error = None;
            }
            AuthAction::Register(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.error = Some(REGISTER_FAILED.to_string());
            }

            AuthAction::Login(Lifecycle::Fulfilled(user)) => {
                next.is_loading = false;
                next.is_auth_checked = true;
                next.user = Some(user);
                next.error = None;
            }
            AuthAction::Login(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.is_auth_checked = false;
                next.error = Some(LOGIN_FAILED.to_string());
            }

            AuthAction::Logout(Lifecycle::Fulfilled(())) => {
                next.is_loading = false;
                next.user = None;
                next.error = None;
            }
            AuthAction::Logout(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.is_auth_checked = true;
                next.user = None;
                next.error = Some(LOGOUT_FAILED.to_string());
            }

            AuthAction::GetUser(Lifecycle::Fulfilled(user)) => {
                next.is_loading = false;
                next.is_auth_checked = true;
                next.user = Some(user);
                next.error = None;
            }
            AuthAction::GetUser(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.error = Some(GET_USER_FAILED.to_string());
            }

            AuthAction::UpdateUser(Lifecycle::Fulfilled(user)) => {
                next.is_loading = false;
                next.user = Some(user);
                next.error = None;
            }
            AuthAction::UpdateUser(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.error = Some(UPDATE_USER_FAILED.to_string());
            }
        }

        Ok(next)
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
