//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /{code}`            - Short link redirect (public)
//! - `GET    /health`            - Health check: DB, cache, pipelines
//! - `POST   /api/shorten`       - Create a short link
//! - `GET    /api/links`         - List links
//! - `DELETE /api/links/{code}`  - Delete a link
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Path normalization** - trailing slash handling

use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// Route registration order gives `/health` and `/api/*` precedence over
/// the catch-all `/{code}` redirect; those prefixes are also reserved at
/// code-validation time.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
