//! HTTP surface for joblens.
//!
//! Exposes the analytics report and a health probe over axum. The binary in
//! `main.rs` wires configuration and tracing; everything here is reusable in
//! tests with any `Joblens` instance.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use joblens::{Joblens, JoblensError};
use joblens_adzuna::{AdzunaConnector, ExchangeRateConnector};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// Routes of the public API, with CORS opened and request tracing on.
pub fn app_router(joblens: Arc<Joblens>) -> Router {
    Router::new()
        .route("/analytics", get(routes::analytics))
        .route("/api/jobs/analytics", get(routes::analytics))
        .route("/health", get(routes::health))
        .route("/api/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(joblens)
}

/// Build the orchestrator against Adzuna and the exchange-rate service.
///
/// # Errors
/// Returns `InvalidArg` when Adzuna credentials are missing or a base URL is
/// unusable.
pub fn build_joblens(cfg: &ServerConfig) -> Result<Joblens, JoblensError> {
    let (Some(app_id), Some(app_key)) = (&cfg.adzuna_app_id, &cfg.adzuna_app_key) else {
        return Err(JoblensError::InvalidArg(
            "ADZUNA_APP_ID and ADZUNA_APP_KEY must be set".into(),
        ));
    };
    let connector = AdzunaConnector::with_base_url(
        app_id.as_str(),
        app_key.as_str(),
        &cfg.adzuna_base_url,
    )?;
    let rates = ExchangeRateConnector::with_base_url(&cfg.exchange_rate_base_url)?;

    Joblens::builder()
        .with_connector(Arc::new(connector))
        .with_rate_provider(Arc::new(rates))
        .base_currency(cfg.base_currency.as_str())
        .provider_timeout(cfg.provider_timeout)
        .retry(cfg.retry())
        .build()
}
