//! Handlers for program invitation endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::invitation::{
    InvitationItem, InvitationListResponse, InviteUserRequest, RevokeInvitationsRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists a program's invitations.
///
/// # Endpoint
///
/// `GET /api/programs/{short_name}/invitations`
pub async fn invitation_list_handler(
    Path(short_name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<InvitationListResponse>, AppError> {
    let invitations = state.program_service.list_invitations(&short_name).await?;

    Ok(Json(InvitationListResponse {
        items: invitations.into_iter().map(InvitationItem::from).collect(),
    }))
}

/// Invites a user to a program.
///
/// # Endpoint
///
/// `POST /api/programs/{short_name}/invitations`
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 404 if the program does not exist.
/// Returns 409 if the email already has a pending invitation.
pub async fn invite_user_handler(
    Path(short_name): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<InviteUserRequest>,
) -> Result<(StatusCode, Json<InvitationItem>), AppError> {
    payload.validate()?;

    let invitation = state
        .program_service
        .invite_user(&short_name, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(invitation.into())))
}

/// Revokes invitations by id.
///
/// # Endpoint
///
/// `DELETE /api/programs/{short_name}/invitations`
///
/// ```json
/// { "ids": [3, 4] }
/// ```
///
/// # Errors
///
/// Returns 404 listing every id that is not an invitation of the program.
/// Nothing is revoked in that case.
pub async fn revoke_invitations_handler(
    Path(short_name): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<RevokeInvitationsRequest>,
) -> Result<Json<InvitationListResponse>, AppError> {
    payload.validate()?;

    let revoked = state
        .program_service
        .revoke_invitations(&short_name, &payload.ids)
        .await?;

    Ok(Json(InvitationListResponse {
        items: revoked.into_iter().map(InvitationItem::from).collect(),
    }))
}

/// Accepts a pending invitation.
///
/// # Endpoint
///
/// `POST /api/programs/{short_name}/invitations/{id}/accept`
///
/// # Errors
///
/// Returns 400 if the invitation has expired.
/// Returns 404 if the program or invitation does not exist.
/// Returns 409 if the invitation is no longer pending.
pub async fn accept_invitation_handler(
    Path((short_name, id)): Path<(String, i64)>,
    State(state): State<AppState>,
) -> Result<Json<InvitationItem>, AppError> {
    let invitation = state
        .program_service
        .accept_invitation(&short_name, id)
        .await?;

    Ok(Json(invitation.into()))
}
