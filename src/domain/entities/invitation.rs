//! Invitation entity: a user invited to join a program.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::associator::Identifiable;

/// Role granted to a user within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Curator,
    Submitter,
    Member,
    Banned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

/// An invitation owned by a program.
///
/// `program` is the back-reference to the owning program's short name; it is
/// set and cleared by [`crate::domain::relations::program_invitations`].
#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
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

impl Invitation {
    /// Creates a pending invitation not yet attached to a program.
    pub fn pending(
        id: i64,
        invite: NewInvitation,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            program: None,
            email: invite.email,
            first_name: invite.first_name,
            last_name: invite.last_name,
            role: invite.role,
            status: InvitationStatus::Pending,
            created_at,
            expires_at,
            accepted_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Returns true if the invitation is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl Identifiable for Invitation {
    type Id = i64;
    const KIND: &'static str = "Invitation";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Input data for inviting a user to a program.
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}
