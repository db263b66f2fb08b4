//! Handlers for taxonomy endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::taxonomy::{AddInstitutionsRequest, TermItem, TermListResponse};
use crate::domain::entities::TermKind;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the terms of one taxonomy with their linked programs.
///
/// # Endpoint
///
/// `GET /api/taxonomy/{kind}`
///
/// `kind` is one of `cancers`, `primary-sites`, `countries`, `institutions`,
/// `regions`.
///
/// # Errors
///
/// Returns 404 for an unknown taxonomy.
pub async fn term_list_handler(
    Path(kind): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TermListResponse>, AppError> {
    let kind: TermKind = kind
        .parse()
        .map_err(|message: String| AppError::not_found(message, json!({ "kind": kind })))?;

    let terms = state.taxonomy_service.list(kind).await?;

    Ok(Json(TermListResponse {
        kind: kind.to_string(),
        items: terms.into_iter().map(TermItem::from).collect(),
    }))
}

/// Registers new institutions.
///
/// # Endpoint
///
/// `POST /api/taxonomy/institutions`
///
/// Institutions are the only taxonomy that grows at runtime.
///
/// # Errors
///
/// Returns 400 for any other taxonomy, an empty list or a blank name.
/// Returns 409 listing names that already exist. Nothing is added then.
pub async fn add_institutions_handler(
    Path(kind): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<AddInstitutionsRequest>,
) -> Result<(StatusCode, Json<TermListResponse>), AppError> {
    if kind.parse::<TermKind>() != Ok(TermKind::Institutions) {
        return Err(AppError::bad_request(
            "Only institutions can be added",
            json!({ "kind": kind }),
        ));
    }

    payload.validate()?;

    let added = state.taxonomy_service.add_institutions(&payload.names).await?;

    Ok((
        StatusCode::CREATED,
        Json(TermListResponse {
            kind: TermKind::Institutions.to_string(),
            items: added.into_iter().map(TermItem::from).collect(),
        }),
    ))
}
