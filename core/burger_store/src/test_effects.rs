use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{AuthState, GET_USER_FAILED, LOGIN_FAILED, LOGOUT_FAILED, REGISTER_FAILED, UPDATE_USER_FAILED};
use crate::constructor::ConstructorAction;
use crate::effects::Effects;
use crate::errors::{ApiError, EffectError, OrderError, PersistenceError};
use crate::feed::LOAD_FEED_FAILED;
use crate::ingredients::LOAD_INGREDIENTS_FAILED;
use crate::invariants::{assert_settled, sample_catalog, sample_order, sample_user};
use crate::mock_api::MockApi;
use crate::orders::{LOAD_HISTORY_FAILED, ORDER_NOT_FOUND, SUBMIT_ORDER_FAILED};
use crate::ports::{AuthResponse, CredentialStore, InMemoryCredentials, MessageResponse, ProfileUpdate, UserResponse};
use crate::store::{RootState, Store};
use crate::types::{FeedSnapshot, FeedTotals, OrderReceipt, OrderStatus, PlacedOrder, User};

fn setup(api: MockApi, credentials: InMemoryCredentials) -> (Effects, Arc<MockApi>, Arc<InMemoryCredentials>) {
    setup_with_state(api, credentials, RootState::default())
}

fn setup_with_state(
    api: MockApi,
    credentials: InMemoryCredentials,
    state: RootState,
) -> (Effects, Arc<MockApi>, Arc<InMemoryCredentials>) {
    let api = Arc::new(api);
    let credentials = Arc::new(credentials);
    let effects = Effects::new(Store::with_state(state), api.clone(), credentials.clone());
    (effects, api, credentials)
}

fn auth_ok() -> AuthResponse {
    AuthResponse {
        success: true,
        user: sample_user(),
        access_token: "Bearer access".into(),
        refresh_token: "refresh".into(),
    }
}

fn signed_in() -> RootState {
    RootState {
        auth: AuthState {
            user: Some(sample_user()),
            is_auth_checked: true,
            ..AuthState::default()
        },
        ..RootState::default()
    }
}

fn transport() -> ApiError {
    ApiError::Transport("connection reset".into())
}

// ─────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn check_auth_without_token_skips_profile_fetch() {
    let (effects, api, _) = setup(MockApi::new(), InMemoryCredentials::new());

    effects.check_auth().await.unwrap();

    let auth = effects.store().select(|s| s.auth.clone());
    assert!(auth.is_auth_checked);
    assert_eq!(auth.user, None);
    assert_settled(&auth);
    assert_eq!(api.calls("profile"), 0);
}

#[tokio::test]
async fn check_auth_with_token_restores_user() {
    let api = MockApi::new().with_profile(Ok(UserResponse {
        success: true,
        user: sample_user(),
    }));
    let (effects, api, _) = setup(api, InMemoryCredentials::with_tokens(Some("Bearer a"), Some("r")));

    effects.check_auth().await.unwrap();

    let auth = effects.store().select(|s| s.auth.clone());
    assert_eq!(auth.user, Some(sample_user()));
    assert!(auth.is_auth_checked);
    assert_settled(&auth);
    assert_eq!(api.calls("profile"), 1);
}

#[tokio::test]
async fn check_auth_completes_even_when_profile_fetch_fails() {
    let api = MockApi::new().with_profile(Err(ApiError::Http {
        status: 403,
        message: "jwt malformed".into(),
    }));
    let (effects, _, _) = setup(api, InMemoryCredentials::with_tokens(Some("Bearer a"), None));

    effects.check_auth().await.unwrap();

    let auth = effects.store().select(|s| s.auth.clone());
    assert!(auth.is_auth_checked);
    assert_eq!(auth.user, None);
    assert_eq!(auth.error.as_deref(), Some(GET_USER_FAILED));
    assert_settled(&auth);
}

#[tokio::test]
async fn login_persists_tokens_and_user() {
    let (effects, _, credentials) = setup(MockApi::new().with_login(Ok(auth_ok())), InMemoryCredentials::new());

    let user = effects.login("david@yandex.ru", "secret").await.unwrap();

    assert_eq!(user, sample_user());
    assert_eq!(credentials.access_token().await.unwrap().as_deref(), Some("Bearer access"));
    assert_eq!(credentials.refresh_token().await.unwrap().as_deref(), Some("refresh"));
    assert_eq!(
        effects.store().select(|s| s.auth.clone()),
        AuthState {
            user: Some(sample_user()),
            is_auth_checked: true,
            ..AuthState::default()
        }
    );
}

#[tokio::test]
async fn superseded_login_does_not_persist_its_tokens() {
    let other = AuthResponse {
        success: true,
        user: User {
            email: "anna@yandex.ru".into(),
            name: "Anna".into(),
        },
        access_token: "Bearer stale".into(),
        refresh_token: "stale".into(),
    };
    let (effects, _, credentials) = setup(
        MockApi::new()
            .with_login_after(Duration::from_millis(200), Ok(other))
            .with_login_after(Duration::ZERO, Ok(auth_ok())),
        InMemoryCredentials::new(),
    );

    let (first, second) = tokio::join!(
        effects.login("anna@yandex.ru", "secret"),
        effects.login("david@yandex.ru", "secret"),
    );
    assert!(first.is_ok());
    assert_eq!(second.unwrap(), sample_user());

    assert_eq!(effects.store().select(|s| s.auth.user.clone()), Some(sample_user()));
    assert_eq!(credentials.access_token().await.unwrap().as_deref(), Some("Bearer access"));
    assert_eq!(credentials.refresh_token().await.unwrap().as_deref(), Some("refresh"));
}

#[tokio::test]
async fn login_refused_by_server_stores_nothing() {
    let refused = AuthResponse {
        success: false,
        ..AuthResponse::default()
    };
    let (effects, _, credentials) = setup_with_state(
        MockApi::new().with_login(Ok(refused)),
        InMemoryCredentials::new(),
        RootState {
            auth: AuthState {
                is_auth_checked: true,
                ..AuthState::default()
            },
            ..RootState::default()
        },
    );

    let err = effects.login("david@yandex.ru", "wrong").await.unwrap_err();

    assert!(matches!(err, EffectError::Rejected("login")));
    assert_eq!(credentials.access_token().await.unwrap(), None);
    assert_eq!(
        effects.store().select(|s| s.auth.clone()),
        AuthState {
            error: Some(LOGIN_FAILED.into()),
            ..AuthState::default()
        }
    );
}

#[tokio::test]
async fn login_transport_failure_keeps_user() {
    let (effects, _, _) = setup_with_state(
        MockApi::new().with_login(Err(transport())),
        InMemoryCredentials::new(),
        signed_in(),
    );

    effects.login("david@yandex.ru", "secret").await.unwrap_err();

    let auth = effects.store().select(|s| s.auth.clone());
    assert_eq!(auth.user, Some(sample_user()));
    assert!(!auth.is_auth_checked);
    assert_eq!(auth.error.as_deref(), Some(LOGIN_FAILED));
}

#[tokio::test]
async fn register_sets_user_without_asserting_auth_check() {
    let (effects, _, credentials) =
        setup(MockApi::new().with_register(Ok(auth_ok())), InMemoryCredentials::new());

    effects.register("david@yandex.ru", "David", "secret").await.unwrap();

    let auth = effects.store().select(|s| s.auth.clone());
    assert_eq!(auth.user, Some(sample_user()));
    assert!(!auth.is_auth_checked);
    assert_eq!(credentials.refresh_token().await.unwrap().as_deref(), Some("refresh"));
}

#[tokio::test]
async fn register_failure_sets_error() {
    let (effects, _, _) = setup(MockApi::new().with_register(Err(transport())), InMemoryCredentials::new());

    effects.register("david@yandex.ru", "David", "secret").await.unwrap_err();

    assert_eq!(
        effects.store().select(|s| s.auth.error.clone()).as_deref(),
        Some(REGISTER_FAILED)
    );
}

#[tokio::test]
async fn logout_returns_auth_to_initial_shape() {
    let api = MockApi::new().with_logout(Ok(MessageResponse {
        success: true,
        message: Some("Successful logout".into()),
    }));
    let (effects, _, credentials) = setup(api, InMemoryCredentials::with_tokens(Some("Bearer a"), Some("r")));

    effects.logout().await.unwrap();

    assert_eq!(effects.store().select(|s| s.auth.clone()), AuthState::default());
    assert_eq!(credentials.access_token().await.unwrap(), None);
    assert_eq!(credentials.refresh_token().await.unwrap(), None);
}

#[tokio::test]
async fn logout_clears_local_session_even_when_server_fails() {
    let (effects, api, credentials) = setup_with_state(
        MockApi::new().with_logout(Err(transport())),
        InMemoryCredentials::with_tokens(Some("Bearer a"), Some("r")),
        signed_in(),
    );

    effects.logout().await.unwrap_err();

    assert_eq!(api.calls("logout"), 1);
    assert_eq!(credentials.access_token().await.unwrap(), None);
    assert_eq!(credentials.refresh_token().await.unwrap(), None);
    assert_eq!(
        effects.store().select(|s| s.auth.clone()),
        AuthState {
            is_auth_checked: true,
            error: Some(LOGOUT_FAILED.into()),
            ..AuthState::default()
        }
    );
}

/// Holds tokens in memory but cannot delete the access token.
struct StuckAccessToken(InMemoryCredentials);

#[async_trait]
impl CredentialStore for StuckAccessToken {
    async fn access_token(&self) -> Result<Option<String>, PersistenceError> {
        self.0.access_token().await
    }

    async fn set_access_token(&self, token: &str) -> Result<(), PersistenceError> {
        self.0.set_access_token(token).await
    }

    async fn delete_access_token(&self) -> Result<(), PersistenceError> {
        Err(PersistenceError("disk".into()))
    }

    async fn refresh_token(&self) -> Result<Option<String>, PersistenceError> {
        self.0.refresh_token().await
    }

    async fn set_refresh_token(&self, token: &str) -> Result<(), PersistenceError> {
        self.0.set_refresh_token(token).await
    }

    async fn clear_all(&self) -> Result<(), PersistenceError> {
        self.0.clear_all().await
    }
}

#[tokio::test]
async fn logout_clears_store_even_when_access_delete_fails() {
    let api = MockApi::new().with_logout(Ok(MessageResponse {
        success: true,
        message: None,
    }));
    let credentials = Arc::new(StuckAccessToken(InMemoryCredentials::with_tokens(
        Some("Bearer a"),
        Some("r"),
    )));
    let effects = Effects::new(
        Store::with_state(signed_in()),
        Arc::new(api),
        credentials.clone(),
    );

    let err = effects.logout().await.unwrap_err();

    assert!(matches!(err, EffectError::Persistence(_)));
    assert_eq!(credentials.refresh_token().await.unwrap(), None);
    assert_eq!(credentials.access_token().await.unwrap(), None);
    let auth = effects.store().select(|s| s.auth.clone());
    assert_eq!(auth.user, None);
    assert_eq!(auth.error.as_deref(), Some(LOGOUT_FAILED));
}

#[tokio::test]
async fn update_user_replaces_profile_or_keeps_it() {
    let renamed = User {
        name: "Давид".into(),
        ..sample_user()
    };
    let api = MockApi::new().with_update(Ok(UserResponse {
        success: true,
        user: renamed.clone(),
    }));
    let (effects, _, _) = setup_with_state(api, InMemoryCredentials::new(), signed_in());

    let update = ProfileUpdate {
        name: Some("Давид".into()),
        ..ProfileUpdate::default()
    };
    effects.update_user(update.clone()).await.unwrap();
    assert_eq!(effects.store().select(|s| s.auth.user.clone()), Some(renamed.clone()));

    let (effects, _, _) = setup_with_state(
        MockApi::new().with_update(Err(transport())),
        InMemoryCredentials::new(),
        signed_in(),
    );
    effects.update_user(update).await.unwrap_err();
    let auth = effects.store().select(|s| s.auth.clone());
    assert_eq!(auth.user, Some(sample_user()));
    assert_eq!(auth.error.as_deref(), Some(UPDATE_USER_FAILED));
}

// ─────────────────────────────────────────────────────────
// Catalog and feed
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn ingredient_reload_failure_keeps_catalog() {
    let (effects, _, _) = setup(
        MockApi::new().with_ingredients(Ok(sample_catalog())),
        InMemoryCredentials::new(),
    );
    assert_eq!(effects.load_ingredients().await.unwrap(), 4);

    let loaded = effects.store().snapshot();
    let (effects, _, _) = setup_with_state(
        MockApi::new().with_ingredients(Err(transport())),
        InMemoryCredentials::new(),
        loaded,
    );
    effects.load_ingredients().await.unwrap_err();

    let ingredients = effects.store().select(|s| s.ingredients.clone());
    assert_eq!(ingredients.ingredients, sample_catalog());
    assert_eq!(ingredients.error.as_deref(), Some(LOAD_INGREDIENTS_FAILED));
    assert!(!ingredients.is_loading);
}

#[tokio::test]
async fn feed_fulfilled_applies_snapshot() {
    let o1 = sample_order(1, OrderStatus::Done);
    let o2 = sample_order(2, OrderStatus::Pending);
    let snapshot = FeedSnapshot {
        orders: vec![o1.clone(), o2.clone()],
        totals: FeedTotals {
            total: 50,
            total_today: 5,
        },
    };
    let (effects, _, _) = setup(
        MockApi::new().with_feed(Duration::ZERO, Ok(snapshot)),
        InMemoryCredentials::new(),
    );

    let totals = effects.load_feed().await.unwrap();

    assert_eq!(totals.total, 50);
    let feed = effects.store().select(|s| s.feed.clone());
    assert_eq!(feed.orders, vec![o1, o2]);
    assert_eq!(feed.feed.total, 50);
    assert_eq!(feed.feed.total_today, 5);
    assert!(!feed.is_loading);
}

#[tokio::test]
async fn slow_superseded_feed_request_does_not_overwrite_newer_one() {
    let stale = FeedSnapshot {
        orders: vec![sample_order(1, OrderStatus::Pending)],
        totals: FeedTotals {
            total: 1,
            total_today: 1,
        },
    };
    let fresh = FeedSnapshot {
        orders: vec![sample_order(1, OrderStatus::Done), sample_order(2, OrderStatus::Pending)],
        totals: FeedTotals {
            total: 2,
            total_today: 2,
        },
    };
    let (effects, _, _) = setup(
        MockApi::new()
            .with_feed(Duration::from_millis(200), Ok(stale))
            .with_feed(Duration::ZERO, Ok(fresh.clone())),
        InMemoryCredentials::new(),
    );

    let (first, second) = tokio::join!(effects.load_feed(), effects.load_feed());
    assert!(first.is_ok());
    assert!(second.is_ok());

    let feed = effects.store().select(|s| s.feed.clone());
    assert_eq!(feed.orders, fresh.orders);
    assert_eq!(feed.feed, fresh.totals);
    assert!(!feed.is_loading);
}

#[tokio::test]
async fn feed_failure_sets_error() {
    let (effects, _, _) = setup(
        MockApi::new().with_feed(Duration::ZERO, Err(transport())),
        InMemoryCredentials::new(),
    );

    effects.load_feed().await.unwrap_err();

    assert_eq!(
        effects.store().select(|s| s.feed.error.clone()).as_deref(),
        Some(LOAD_FEED_FAILED)
    );
}

// ─────────────────────────────────────────────────────────
// Orders
// ─────────────────────────────────────────────────────────

fn draft_store_state() -> RootState {
    let catalog = sample_catalog();
    let mut state = signed_in();
    state.ingredients.ingredients = catalog.clone();
    for action in [
        ConstructorAction::add_ingredient(&catalog[0]),
        ConstructorAction::add_ingredient(&catalog[2]),
        ConstructorAction::add_ingredient(&catalog[3]),
    ] {
        state.constructor = crate::store::Reducer::reduce(&state.constructor, action).unwrap();
    }
    state
}

#[tokio::test]
async fn successful_submission_clears_draft() {
    let receipt = OrderReceipt {
        success: true,
        name: "Краторный spicy био-марсианский бургер".into(),
        order: PlacedOrder { number: 46208 },
    };
    let (effects, api, _) = setup_with_state(
        MockApi::new().with_submit(Ok(receipt)),
        InMemoryCredentials::new(),
        draft_store_state(),
    );
    let catalog = sample_catalog();

    let placed = effects.submit_draft().await.unwrap();

    assert_eq!(placed.order.number, 46208);
    assert_eq!(
        api.submitted(),
        vec![vec![
            catalog[0].id.clone(),
            catalog[2].id.clone(),
            catalog[3].id.clone(),
            catalog[0].id.clone(),
        ]]
    );

    let state = effects.store().snapshot();
    assert_eq!(state.constructor.bun, None);
    assert!(state.constructor.fillings.is_empty());
    assert_eq!(state.orders.last_order_number(), Some(46208));
    assert!(!state.orders.order_request);
}

#[tokio::test]
async fn failed_submission_preserves_draft() {
    let (effects, _, _) = setup_with_state(
        MockApi::new().with_submit(Err(ApiError::Http {
            status: 500,
            message: "internal".into(),
        })),
        InMemoryCredentials::new(),
        draft_store_state(),
    );
    let before = effects.store().select(|s| s.constructor.clone());

    effects.submit_draft().await.unwrap_err();

    let state = effects.store().snapshot();
    assert_eq!(state.constructor, before);
    assert_eq!(state.orders.error.as_deref(), Some(SUBMIT_ORDER_FAILED));
    assert_eq!(state.orders.last_order, None);
}

#[tokio::test]
async fn draft_without_bun_is_not_sent() {
    let (effects, api, _) = setup(MockApi::new(), InMemoryCredentials::new());
    effects
        .store()
        .dispatch(ConstructorAction::add_filling(&sample_catalog()[2]))
        .unwrap();

    let err = effects.submit_draft().await.unwrap_err();

    assert!(matches!(err, EffectError::Order(OrderError::MissingBun)));
    assert_eq!(api.calls("submit"), 0);
    assert_eq!(effects.store().select(|s| s.constructor.fillings.len()), 1);
}

#[tokio::test]
async fn history_requires_signed_in_user() {
    let (effects, api, _) = setup(
        MockApi::new().with_history(Ok(vec![sample_order(1, OrderStatus::Done)])),
        InMemoryCredentials::new(),
    );

    let err = effects.load_order_history().await.unwrap_err();

    assert!(matches!(err, EffectError::Unauthenticated));
    assert_eq!(api.calls("history"), 0);
    assert_eq!(
        effects.store().select(|s| s.orders.error.clone()).as_deref(),
        Some(LOAD_HISTORY_FAILED)
    );
}

#[tokio::test]
async fn history_loads_for_signed_in_user() {
    let orders = vec![sample_order(1, OrderStatus::Done), sample_order(2, OrderStatus::Created)];
    let (effects, _, _) = setup_with_state(
        MockApi::new().with_history(Ok(orders.clone())),
        InMemoryCredentials::new(),
        signed_in(),
    );

    assert_eq!(effects.load_order_history().await.unwrap(), 2);
    let state = effects.store().select(|s| s.orders.clone());
    assert_eq!(state.orders, orders);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn order_lookup_by_number() {
    let order = sample_order(46208, OrderStatus::Done);
    let (effects, _, _) = setup(
        MockApi::new().with_order(Ok(Some(order.clone()))),
        InMemoryCredentials::new(),
    );
    assert_eq!(effects.load_order_by_number(46208).await.unwrap(), order);

    let (effects, _, _) = setup(MockApi::new().with_order(Ok(None)), InMemoryCredentials::new());
    let err = effects.load_order_by_number(1).await.unwrap_err();
    assert!(matches!(err, EffectError::OrderNotFound(1)));
    assert_eq!(
        effects.store().select(|s| s.orders.error.clone()).as_deref(),
        Some(ORDER_NOT_FOUND)
    );
}
