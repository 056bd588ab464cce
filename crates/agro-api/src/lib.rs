//! # agro-api — HTTP Service for the Producer Registry
//!
//! ## API Surface
//!
//! | Prefix                                      | Module                    |
//! |---------------------------------------------|---------------------------|
//! | `/v1/producers/*`                           | [`routes::producers`]     |
//! | `/v1/producers/{producer_id}/properties/*`   | [`routes::properties`]    |
//! | `/v1/producers/{producer_id}/crop-seasons/*` | [`routes::crop_seasons`]  |
//! | `/health/*`                                 | probes                    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsLayer → Handler
//! ```
//!
//! Audit attribution comes from the `x-user-id`, `x-forwarded-for` and
//! `user-agent` headers; there is no authentication layer.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::producers::router())
        .merge(routes::properties::router())
        .merge(routes::crop_seasons::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the router is serving.
async fn readiness() -> &'static str {
    "ready"
}
