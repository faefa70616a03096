//! Handlers for link listing and deletion.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::links::{LinkListResponse, ListLinksQuery};
use crate::application::services::domain_resolver::SYSTEM_OWNER_ID;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&limit=20`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    let page = state
        .link_service
        .list_links(SYSTEM_OWNER_ID, query.page, query.limit)
        .await?;

    Ok(Json(page.into()))
}

/// Deletes a link by its short code.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Response Codes
///
/// - **204 No Content**: link deleted
/// - **404 Not Found**: no such link
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(SYSTEM_OWNER_ID, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}
