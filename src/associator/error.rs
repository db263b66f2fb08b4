//! Errors raised while linking or unlinking entities.

use std::fmt::Display;
use thiserror::Error;

use super::identity::Identifiable;

/// Relationship membership violation.
///
/// Callers translate these into protocol errors; see
/// [`crate::error::AppError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssociatorError {
    /// The association being created already exists.
    #[error("{child_kind} '{child_id}' is already associated with {parent_kind} '{parent_id}'")]
    Conflict {
        parent_kind: &'static str,
        parent_id: String,
        child_kind: &'static str,
        child_id: String,
    },

    /// One or more associations being removed do not exist.
    #[error("{parent_kind} '{parent_id}' has no associated {child_kind} with ids: {}", .missing.join(", "))]
    NotFound {
        parent_kind: &'static str,
        parent_id: String,
        child_kind: &'static str,
        missing: Vec<String>,
    },
}

impl AssociatorError {
    pub(crate) fn conflict<P, C>(parent: &P, child_id: &C::Id) -> Self
    where
        P: Identifiable,
        C: Identifiable,
    {
        Self::Conflict {
            parent_kind: P::KIND,
            parent_id: parent.id().to_string(),
            child_kind: C::KIND,
            child_id: child_id.to_string(),
        }
    }

    /// Builds a not-found error; `missing` is rendered in the order given,
    /// which callers keep sorted.
    pub(crate) fn not_found<P, I>(parent: &P, child_kind: &'static str, missing: I) -> Self
    where
        P: Identifiable,
        I: IntoIterator,
        I::Item: Display,
    {
        Self::NotFound {
            parent_kind: P::KIND,
            parent_id: parent.id().to_string(),
            child_kind,
            missing: missing.into_iter().map(|id| id.to_string()).collect(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message() {
        let err = AssociatorError::Conflict {
            parent_kind: "Program",
            parent_id: "TEST-CA".to_string(),
            child_kind: "Invitation",
            child_id: "12".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Invitation '12' is already associated with Program 'TEST-CA'"
        );
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_message_lists_every_id() {
        let err = AssociatorError::NotFound {
            parent_kind: "Program",
            parent_id: "TEST-CA".to_string(),
            child_kind: "Cancer",
            missing: vec!["3".to_string(), "4".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Program 'TEST-CA' has no associated Cancer with ids: 3, 4"
        );
        assert!(err.is_not_found());
    }
}
