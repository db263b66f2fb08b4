//! DTOs for program invitation endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Invitation, InvitationStatus, NewInvitation, UserRole};

/// Request to invite a user to a program.
#[derive(Debug, Deserialize, Validate)]
pub struct InviteUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    pub role: UserRole,
}

impl From<InviteUserRequest> for NewInvitation {
    fn from(req: InviteUserRequest) -> Self {
        NewInvitation {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
        }
    }
}

/// Request to revoke invitations by id.
#[derive(Debug, Deserialize, Validate)]
pub struct RevokeInvitationsRequest {
    #[validate(length(min = 1, message = "At least one id is required"))]
    pub ids: Vec<i64>,
}

/// Individual invitation information.
#[derive(Debug, Serialize)]
pub struct InvitationItem {
    pub id: i64,
    pub program: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl From<Invitation> for InvitationItem {
    fn from(i: Invitation) -> Self {
        InvitationItem {
            id: i.id,
            program: i.program,
            email: i.email,
            first_name: i.first_name,
            last_name: i.last_name,
            role: i.role,
            status: i.status,
            created_at: i.created_at,
            expires_at: i.expires_at,
            accepted_at: i.accepted_at,
        }
    }
}

/// Response containing list of invitations.
#[derive(Debug, Serialize)]
pub struct InvitationListResponse {
    pub items: Vec<InvitationItem>,
}
