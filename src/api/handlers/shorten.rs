//! Handler for link creation.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{LinkResponse, ShortenRequest};
use crate::application::services::domain_resolver::SYSTEM_OWNER_ID;
use crate::application::services::link_service::CreateLinkRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link, idempotently per normalized URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Response Codes
///
/// - **201 Created**: a new link was allocated
/// - **200 OK**: an identical submission returned the existing link
/// - **400 Bad Request**: invalid URL or custom code
/// - **409 Conflict**: custom code already taken by a different URL
/// - **503 Service Unavailable**: code address space exhausted
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(req): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    req.validate()
        .map_err(|e| AppError::bad_request("Invalid request", json!({ "fields": e.to_string() })))?;

    let outcome = state
        .link_service
        .create_link(
            SYSTEM_OWNER_ID,
            CreateLinkRequest {
                url: req.url,
                custom_code: req.custom_code,
                title: req.title,
                domain_id: req.domain_id,
            },
        )
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(outcome.into())))
}
