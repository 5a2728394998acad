//! Burger builder client — entry point.
//!
//! Restores the stored session, loads the ingredient catalog, keeps the
//! live order feed fresh in the background, and exposes the store through
//! a small read-only Axum API for inspection.

mod api;
mod config;
mod db;
mod errors;
mod inspector;
mod poller;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use burger_store::{Effects, Store};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use api::HttpBurgerApi;
use config::Config;
use db::SqliteCredentials;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Credentials survive restarts; everything else starts empty.
    let pool = db::init_pool(&config.database_url).await?;
    let credentials = Arc::new(SqliteCredentials::new(pool));

    let client = Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;
    let api = Arc::new(HttpBurgerApi::new(client, &config.api_url, credentials.clone()));

    let store = Store::new();
    let effects = Effects::new(store.clone(), api, credentials);

    // ─── Session and catalog ──────────────────────────────
    if let Err(e) = effects.check_auth().await {
        warn!("Auth check failed: {e}");
    }
    match store.select(|s| s.auth.user.clone()) {
        Some(user) => info!("Session restored for {}", user.name),
        None => info!("No active session"),
    }

    match effects.load_ingredients().await {
        Ok(count) => info!("Catalog loaded: {count} ingredients"),
        Err(e) => warn!("Catalog unavailable: {e}"),
    }

    // ─── Live feed ────────────────────────────────────────
    let shutdown = CancellationToken::new();
    let poller = tokio::spawn(poller::run(
        effects.clone(),
        Duration::from_secs(config.feed_poll_interval_secs),
        shutdown.clone(),
    ));

    // ─── State inspector ──────────────────────────────────
    let app = Router::new()
        .route("/health", get(inspector::health))
        .route("/state", get(inspector::get_state))
        .route("/state/feed", get(inspector::get_feed))
        .route("/state/constructor", get(inspector::get_constructor))
        .route("/guard", get(inspector::get_guard))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store);

    let addr = format!("0.0.0.0:{}", config.inspector_port);
    info!("Inspector listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl+C, shutting down");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    poller.await?;
    Ok(())
}
