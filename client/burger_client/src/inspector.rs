//! Read-only Axum endpoints exposing the live store for debugging.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use burger_store::{guard, AuthSnapshot, Location, Store};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ConstructorResponse {
    pub bun: Option<String>,
    pub fillings: usize,
    pub total_price: u32,
}

#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    pub path: String,
    #[serde(default)]
    pub guest: bool,
    pub from: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /state`
///
/// The whole root state.
pub async fn get_state(State(store): State<Store>) -> impl IntoResponse {
    Json(store.snapshot())
}

/// `GET /state/feed`
pub async fn get_feed(State(store): State<Store>) -> impl IntoResponse {
    Json(store.select(|s| s.feed.clone()))
}

/// `GET /state/constructor`
///
/// The draft with its price against the loaded catalog.
pub async fn get_constructor(State(store): State<Store>) -> impl IntoResponse {
    Json(store.select(|s| ConstructorResponse {
        bun: s.constructor.bun.as_ref().map(|id| id.to_string()),
        fillings: s.constructor.fillings.len(),
        total_price: s.constructor.total_price(&s.ingredients.ingredients),
    }))
}

/// `GET /guard?path=/profile&guest=false`
///
/// What the route guard would decide for `path` right now.
pub async fn get_guard(State(store): State<Store>, Query(query): Query<GuardQuery>) -> impl IntoResponse {
    let auth = store.select(|s| AuthSnapshot::from(&s.auth));
    let mut location = Location::new(query.path);
    location.from = query.from;
    Json(guard(auth, query.guest, &location))
}
