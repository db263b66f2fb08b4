//! Repository trait for the reference taxonomies.

use crate::domain::entities::Taxonomy;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for reference terms.
///
/// Taxonomies are small, so they move as one snapshot: services load it,
/// mutate the terms' join collections through the associators, and store it
/// back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// Loads a snapshot of every taxonomy.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn load(&self) -> Result<Taxonomy, AppError>;

    /// Replaces the stored taxonomies with `taxonomy`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn store(&self, taxonomy: Taxonomy) -> Result<(), AppError>;
}
