//! Handler for the health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::services::domain_resolver::SYSTEM_OWNER_ID;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: all components healthy
/// - **503 Service Unavailable**: one or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: default-domain query
/// 2. **Cache**: Redis PING (NullCache always reports healthy)
/// 3. **Stats queue**: channel open and remaining capacity
/// 4. **Search queue**: channel open and remaining capacity
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let cache_check = check_cache(&state).await;
    let stats_check = check_stats_queue(&state);
    let search_check = check_search_queue(&state);

    let all_healthy = db_check.is_ok()
        && cache_check.is_ok()
        && stats_check.is_ok()
        && search_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            cache: cache_check,
            stats_queue: stats_check,
            search_queue: search_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks database connectivity by querying the default domain.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.domain_repository.get_default(SYSTEM_OWNER_ID).await {
        Ok(Some(domain)) => CheckStatus::ok(format!("Connected, default domain: {}", domain.hostname)),
        Ok(None) => CheckStatus::ok("Connected, no default domain configured"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

/// Checks cache connectivity via PING command.
async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache responding")
    } else {
        CheckStatus::error("Cache connection failed")
    }
}

/// Checks that the click-statistics queue is operational.
fn check_stats_queue(state: &AppState) -> CheckStatus {
    if state.stats.is_closed() {
        CheckStatus::error("Stats queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.stats.capacity()))
    }
}

/// Checks that the search-index queue is operational.
fn check_search_queue(state: &AppState) -> CheckStatus {
    if state.search.is_closed() {
        CheckStatus::error("Search queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.search.capacity()))
    }
}
