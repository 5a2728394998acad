//! # Effects
//!
//! Asynchronous store operations. Each one dispatches `Pending`, awaits the
//! [`BurgerApi`] / [`CredentialStore`] ports, then dispatches exactly one
//! settlement, so the slice ends up holding either the data or its fixed
//! error message. The same outcome is returned to the caller.
//!
//! Nothing here retries; a retry is a fresh call.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::AuthAction;
use crate::constructor::ConstructorAction;
use crate::errors::{EffectError, OrderError, Result};
use crate::feed::FeedAction;
use crate::ingredients::IngredientsAction;
use crate::lifecycle::{Lifecycle, RequestKind};
use crate::orders::OrdersAction;
use crate::ports::{
    AuthResponse, BurgerApi, CredentialStore, LoginRequest, ProfileUpdate, RegisterRequest,
};
use crate::store::{Action, Store};
use crate::types::{FeedTotals, IngredientId, Order, OrderReceipt, User};

#[derive(Clone)]
pub struct Effects {
    store: Store,
    api: Arc<dyn BurgerApi>,
    credentials: Arc<dyn CredentialStore>,
}

impl Effects {
    pub fn new(store: Store, api: Arc<dyn BurgerApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            api,
            credentials,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run `call` as request `kind`, wrapping each lifecycle step with `wrap`.
    async fn run<T, A, F>(&self, kind: RequestKind, wrap: fn(Lifecycle<T>) -> A, call: F) -> Result<T>
    where
        T: Clone,
        A: Into<Action>,
        F: Future<Output = Result<T>>,
    {
        let (data, _) = self.run_tracked(kind, wrap, call).await?;
        Ok(data)
    }

    /// Like [`run`](Self::run), also reporting whether the fulfilled
    /// settlement reached the store or was dropped as superseded.
    async fn run_tracked<T, A, F>(
        &self,
        kind: RequestKind,
        wrap: fn(Lifecycle<T>) -> A,
        call: F,
    ) -> Result<(T, bool)>
    where
        T: Clone,
        A: Into<Action>,
        F: Future<Output = Result<T>>,
    {
        let request = self.store.begin(kind);
        self.store.dispatch(wrap(Lifecycle::Pending))?;

        match call.await {
            Ok(data) => {
                let applied = self
                    .store
                    .settle(kind, request, wrap(Lifecycle::Fulfilled(data.clone())))?;
                Ok((data, applied))
            }
            Err(e) => {
                warn!("{kind:?} rejected: {e}");
                self.store
                    .settle(kind, request, wrap(Lifecycle::Rejected(e.to_string())))?;
                Err(e)
            }
        }
    }

    /// Persist the token pair of a session that reached the store.
    async fn store_session(&self, response: &AuthResponse, applied: bool) -> Result<()> {
        if !applied {
            debug!("Superseded session for {} not persisted", response.user.email);
            return Ok(());
        }
        self.credentials.set_access_token(&response.access_token).await?;
        self.credentials.set_refresh_token(&response.refresh_token).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────

    /// Resolve whether a session exists. Only hits the network when an
    /// access token is stored.
    pub async fn check_auth(&self) -> Result<()> {
        self.run(RequestKind::CheckAuth, AuthAction::CheckAuth, async {
            if self.credentials.access_token().await?.is_some() {
                if let Err(e) = self.get_user().await {
                    debug!("Stored session could not be restored: {e}");
                }
            } else {
                debug!("No access token stored; skipping profile fetch");
            }
            self.store.dispatch(AuthAction::AuthChecked)?;
            Ok(())
        })
        .await
    }

    pub async fn get_user(&self) -> Result<User> {
        self.run(RequestKind::GetUser, AuthAction::GetUser, async {
            let response = self.api.get_profile().await?;
            if !response.success {
                return Err(EffectError::Rejected("profile fetch"));
            }
            Ok(response.user)
        })
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let (response, applied) = self
            .run_tracked(
                RequestKind::Login,
                |l: Lifecycle<AuthResponse>| AuthAction::Login(l.map(|r| r.user)),
                async {
                    let response = self.api.login(&request).await?;
                    if !response.success {
                        return Err(EffectError::Rejected("login"));
                    }
                    Ok(response)
                },
            )
            .await?;
        self.store_session(&response, applied).await?;

        let user = response.user;
        info!("Signed in as {}", user.email);
        Ok(user)
    }

    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<User> {
        let request = RegisterRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        };

        let (response, applied) = self
            .run_tracked(
                RequestKind::Register,
                |l: Lifecycle<AuthResponse>| AuthAction::Register(l.map(|r| r.user)),
                async {
                    let response = self.api.register(&request).await?;
                    if !response.success {
                        return Err(EffectError::Rejected("registration"));
                    }
                    Ok(response)
                },
            )
            .await?;
        self.store_session(&response, applied).await?;

        let user = response.user;
        info!("Registered {}", user.email);
        Ok(user)
    }

    /// Sign out. Local credentials are wiped whatever the server answers.
    pub async fn logout(&self) -> Result<()> {
        self.run(RequestKind::Logout, AuthAction::Logout, async {
            let refresh_token = match self.credentials.refresh_token().await {
                Ok(token) => token.unwrap_or_default(),
                Err(e) => {
                    warn!("Could not read refresh token before logout: {e}");
                    String::new()
                }
            };

            let response = self.api.logout(&refresh_token).await;

            // Both run even if the first fails; the first failure is reported.
            let deleted = self.credentials.delete_access_token().await;
            let cleared = self.credentials.clear_all().await;
            deleted?;
            cleared?;

            if !response?.success {
                return Err(EffectError::Rejected("logout"));
            }
            info!("Signed out");
            Ok(())
        })
        .await
    }

    pub async fn update_user(&self, update: ProfileUpdate) -> Result<User> {
        self.run(RequestKind::UpdateUser, AuthAction::UpdateUser, async {
            let response = self.api.update_profile(&update).await?;
            if !response.success {
                return Err(EffectError::Rejected("profile update"));
            }
            Ok(response.user)
        })
        .await
    }

    // ─────────────────────────────────────────────────────────
    // Catalog and feed
    // ─────────────────────────────────────────────────────────

    /// Returns the number of catalog entries loaded.
    pub async fn load_ingredients(&self) -> Result<usize> {
        let ingredients = self
            .run(RequestKind::Ingredients, IngredientsAction::Load, async {
                Ok(self.api.list_ingredients().await?)
            })
            .await?;
        Ok(ingredients.len())
    }

    pub async fn load_feed(&self) -> Result<FeedTotals> {
        let snapshot = self
            .run(RequestKind::Feed, FeedAction::Load, async {
                Ok(self.api.get_feed().await?)
            })
            .await?;
        Ok(snapshot.totals)
    }

    // ─────────────────────────────────────────────────────────
    // Orders
    // ─────────────────────────────────────────────────────────

    /// Place an order. On success the constructor draft is cleared; on
    /// failure it is left exactly as it was.
    pub async fn submit_order(&self, ingredients: Vec<IngredientId>) -> Result<OrderReceipt> {
        let receipt = self
            .run(RequestKind::SubmitOrder, OrdersAction::Submit, async {
                let receipt = self.api.submit_order(&ingredients).await?;
                if !receipt.success {
                    return Err(EffectError::Rejected("order submission"));
                }
                Ok(receipt)
            })
            .await?;

        self.store.dispatch(ConstructorAction::Clear)?;
        info!("Order {} placed", receipt.order.number);
        Ok(receipt)
    }

    /// Place an order for whatever is in the constructor.
    pub async fn submit_draft(&self) -> Result<OrderReceipt> {
        let ingredients = self
            .store
            .select(|state| state.constructor.ingredient_ids_for_order())
            .ok_or(OrderError::MissingBun)?;
        self.submit_order(ingredients).await
    }

    /// Returns the number of orders in the history.
    pub async fn load_order_history(&self) -> Result<usize> {
        let authenticated = self.store.select(|state| state.auth.is_authenticated());

        let orders = self
            .run(RequestKind::OrderHistory, OrdersAction::History, async {
                if !authenticated {
                    return Err(EffectError::Unauthenticated);
                }
                Ok(self.api.get_order_history().await?)
            })
            .await?;
        Ok(orders.len())
    }

    pub async fn load_order_by_number(&self, number: u64) -> Result<Order> {
        self.run(RequestKind::OrderByNumber, OrdersAction::ByNumber, async {
            self.api
                .get_order_by_number(number)
                .await?
                .ok_or(EffectError::OrderNotFound(number))
        })
        .await
    }
}
