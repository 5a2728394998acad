//! Burger REST API client.
//!
//! ## Authorization
//!
//! * Authorized endpoints send the stored access token verbatim in the
//!   `authorization` header (the API issues it with its `Bearer ` prefix).
//! * When the API answers `jwt expired`, the token pair is refreshed once via
//!   `/auth/token`, persisted, and the request is replayed.

use std::sync::Arc;

use async_trait::async_trait;
use burger_store::ports::{
    AuthResponse, LoginRequest, MessageResponse, ProfileUpdate, RegisterRequest, TokenResponse,
    UserResponse,
};
use burger_store::types::{FeedSnapshot, Ingredient, IngredientId, Order, OrderReceipt};
use burger_store::{ApiError, BurgerApi, CredentialStore};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

const JWT_EXPIRED: &str = "jwt expired";

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct IngredientsResponse {
    success: bool,
    data: Vec<Ingredient>,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    #[serde(default)]
    success: bool,
    orders: Vec<Order>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────

pub struct HttpBurgerApi {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpBurgerApi {
    pub fn new(client: Client, base_url: &str, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        read_response(request.send().await.map_err(transport)?).await
    }

    async fn send_authorized<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let token = self
            .credentials
            .access_token()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .ok_or(ApiError::Unauthorized)?;

        let mut request = self
            .client
            .request(method, self.url(path))
            .header(AUTHORIZATION, token);
        if let Some(body) = body {
            request = request.json(body);
        }
        read_response(request.send().await.map_err(transport)?).await
    }

    /// Send an authorized request, refreshing the session once if the
    /// access token has expired.
    async fn authorized<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        match self.send_authorized(method.clone(), path, body.as_ref()).await {
            Err(ApiError::Http { message, .. }) if is_expired(&message) => {
                warn!("Access token expired; refreshing session");
                self.refresh_session().await?;
                self.send_authorized(method, path, body.as_ref()).await
            }
            other => other,
        }
    }

    async fn refresh_session(&self) -> Result<(), ApiError> {
        let refresh_token = self
            .credentials
            .refresh_token()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .ok_or(ApiError::Unauthorized)?;

        let tokens = self.refresh_token(&refresh_token).await?;
        if !tokens.success {
            return Err(ApiError::Unauthorized);
        }

        let persist = |e: burger_store::PersistenceError| ApiError::Transport(e.to_string());
        self.credentials
            .set_access_token(&tokens.access_token)
            .await
            .map_err(persist)?;
        self.credentials
            .set_refresh_token(&tokens.refresh_token)
            .await
            .map_err(persist)?;
        debug!("Session refreshed");
        Ok(())
    }
}

#[async_trait]
impl BurgerApi for HttpBurgerApi {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        let response: IngredientsResponse = self.send(Method::GET, "ingredients", None).await?;
        if !response.success {
            return Err(ApiError::Decode("ingredient listing reported failure".to_string()));
        }
        debug!("Fetched {} ingredients", response.data.len());
        Ok(response.data)
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = json!(request);
        self.send(Method::POST, "auth/login", Some(&body)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let body = json!(request);
        self.send(Method::POST, "auth/register", Some(&body)).await
    }

    async fn logout(&self, refresh_token: &str) -> Result<MessageResponse, ApiError> {
        let body = json!({ "token": refresh_token });
        self.send(Method::POST, "auth/logout", Some(&body)).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let body = json!({ "token": refresh_token });
        self.send(Method::POST, "auth/token", Some(&body)).await
    }

    async fn get_profile(&self) -> Result<UserResponse, ApiError> {
        self.authorized(Method::GET, "auth/user", None).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserResponse, ApiError> {
        self.authorized(Method::PATCH, "auth/user", Some(json!(update)))
            .await
    }

    async fn submit_order(&self, ingredients: &[IngredientId]) -> Result<OrderReceipt, ApiError> {
        self.authorized(
            Method::POST,
            "orders",
            Some(json!({ "ingredients": ingredients })),
        )
        .await
    }

    async fn get_feed(&self) -> Result<FeedSnapshot, ApiError> {
        let snapshot: FeedSnapshot = self.send(Method::GET, "orders/all", None).await?;
        debug!(
            "Fetched feed: {} orders (total={}, today={})",
            snapshot.orders.len(),
            snapshot.totals.total,
            snapshot.totals.total_today
        );
        Ok(snapshot)
    }

    async fn get_order_history(&self) -> Result<Vec<Order>, ApiError> {
        let response: OrdersResponse = self.authorized(Method::GET, "orders", None).await?;
        if !response.success {
            return Err(ApiError::Decode("order history reported failure".to_string()));
        }
        Ok(response.orders)
    }

    async fn get_order_by_number(&self, number: u64) -> Result<Option<Order>, ApiError> {
        let response: OrdersResponse = self
            .send(Method::GET, &format!("orders/{number}"), None)
            .await?;
        Ok(response.orders.into_iter().next())
    }
}

// ─────────────────────────────────────────────────────────
// Response decoding
// ─────────────────────────────────────────────────────────

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport)?;
    decode_body(status, &body)
}

/// Turn a status code and raw body into either the typed payload or an
/// [`ApiError::Http`] carrying the server's `message`.
fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(ApiError::Http { status, message });
    }

    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn is_expired(message: &str) -> bool {
    message.trim().eq_ignore_ascii_case(JWT_EXPIRED)
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
