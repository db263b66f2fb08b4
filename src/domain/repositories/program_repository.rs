//! Repository trait for program data access.

use crate::domain::entities::Program;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for programs.
///
/// A stored program carries its join collections and invitations; saving a
/// program persists the whole aggregate as mutated by the associators.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryProgramRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// Finds a program by short name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find(&self, short_name: &str) -> Result<Option<Program>, AppError>;

    /// Lists every program ordered by short name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self) -> Result<Vec<Program>, AppError>;

    /// Stores a new program.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short name is taken.
    async fn insert(&self, program: Program) -> Result<Program, AppError>;

    /// Replaces a stored program.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no program has this short name.
    async fn update(&self, program: Program) -> Result<Program, AppError>;

    /// Deletes a program.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no program has this short name.
    async fn delete(&self, short_name: &str) -> Result<(), AppError>;

    /// Allocates the next invitation id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn next_invitation_id(&self) -> Result<i64, AppError>;
}
