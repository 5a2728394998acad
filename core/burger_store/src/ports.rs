//! Interfaces the store needs from the outside world.
//!
//! * [`BurgerApi`] — the remote burger REST API.
//! * [`CredentialStore`] — persistence of the access and refresh tokens.
//!
//! Response shapes mirror the API bodies; `success` is kept so effects can
//! tell a well-formed refusal from a transport failure.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, PersistenceError};
use crate::types::{FeedSnapshot, Ingredient, IngredientId, Order, OrderReceipt, User};

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Partial profile update; only the set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    pub success: bool,
    pub user: User,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    pub success: bool,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub success: bool,
    pub message: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Ports
// ─────────────────────────────────────────────────────────

#[async_trait]
pub trait BurgerApi: Send + Sync {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// Invalidate `refresh_token` on the server.
    async fn logout(&self, refresh_token: &str) -> Result<MessageResponse, ApiError>;

    /// Exchange `refresh_token` for a new token pair.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError>;

    async fn get_profile(&self) -> Result<UserResponse, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserResponse, ApiError>;

    /// `ingredients` starts and ends with the bun.
    async fn submit_order(&self, ingredients: &[IngredientId]) -> Result<OrderReceipt, ApiError>;

    async fn get_feed(&self) -> Result<FeedSnapshot, ApiError>;

    /// Orders of the signed-in user.
    async fn get_order_history(&self) -> Result<Vec<Order>, ApiError>;

    async fn get_order_by_number(&self, number: u64) -> Result<Option<Order>, ApiError>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, PersistenceError>;

    async fn set_access_token(&self, token: &str) -> Result<(), PersistenceError>;

    async fn delete_access_token(&self) -> Result<(), PersistenceError>;

    async fn refresh_token(&self) -> Result<Option<String>, PersistenceError>;

    async fn set_refresh_token(&self, token: &str) -> Result<(), PersistenceError>;

    /// Forget everything, the refresh token included.
    async fn clear_all(&self) -> Result<(), PersistenceError>;
}

// ─────────────────────────────────────────────────────────
// In-memory credentials
// ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Process-local [`CredentialStore`]; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryCredentials {
    tokens: Mutex<Tokens>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        Self {
            tokens: Mutex::new(Tokens {
                access: access.map(String::from),
                refresh: refresh.map(String::from),
            }),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tokens) -> R) -> Result<R, PersistenceError> {
        let mut tokens = self
            .tokens
            .lock()
            .map_err(|e| PersistenceError(e.to_string()))?;
        Ok(f(&mut tokens))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentials {
    async fn access_token(&self) -> Result<Option<String>, PersistenceError> {
        self.with(|t| t.access.clone())
    }

    async fn set_access_token(&self, token: &str) -> Result<(), PersistenceError> {
        self.with(|t| t.access = Some(token.to_string()))
    }

    async fn delete_access_token(&self) -> Result<(), PersistenceError> {
        self.with(|t| t.access = None)
    }

    async fn refresh_token(&self) -> Result<Option<String>, PersistenceError> {
        self.with(|t| t.refresh.clone())
    }

    async fn set_refresh_token(&self, token: &str) -> Result<(), PersistenceError> {
        self.with(|t| t.refresh = Some(token.to_string()))
    }

    async fn clear_all(&self) -> Result<(), PersistenceError> {
        self.with(|t| *t = Tokens::default())
    }
}
