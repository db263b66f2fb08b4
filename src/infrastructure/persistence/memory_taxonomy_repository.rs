//! In-memory implementation of the taxonomy repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::Taxonomy;
use crate::domain::repositories::TaxonomyRepository;
use crate::error::AppError;

/// Taxonomy snapshot kept in process memory.
pub struct InMemoryTaxonomyRepository {
    taxonomy: RwLock<Taxonomy>,
}

impl InMemoryTaxonomyRepository {
    /// Creates a repository holding `taxonomy`.
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy: RwLock::new(taxonomy),
        }
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryTaxonomyRepository {
    async fn load(&self) -> Result<Taxonomy, AppError> {
        Ok(self.taxonomy.read().await.clone())
    }

    async fn store(&self, taxonomy: Taxonomy) -> Result<(), AppError> {
        *self.taxonomy.write().await = taxonomy;
        Ok(())
    }
}
