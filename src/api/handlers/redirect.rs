//! Handler for short URL redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::application::services::redirect_service::ClickMeta;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the `Host` header to a serving domain
/// 2. Check the cache (key: `redir:{domain_id}:{code}`)
/// 3. On miss, read durable storage and populate the cache
/// 4. Publish a click event to the stats pipeline (fire-and-forget)
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found for unknown codes, and for hosts that yield no
/// domain context when the cross-domain fallback is disabled.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let meta = ClickMeta {
        ip: Some(addr.ip().to_string()),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
        referer: headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
    };

    let url = state.redirect_service.resolve(host, &code, meta).await?;

    Ok(Redirect::temporary(&url))
}
