//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{GraphLock, ProgramService, TaxonomyService};
use crate::infrastructure::persistence::{InMemoryProgramRepository, InMemoryTaxonomyRepository};

pub type Programs = ProgramService<InMemoryProgramRepository, InMemoryTaxonomyRepository>;
pub type Taxonomies = TaxonomyService<InMemoryTaxonomyRepository>;

#[derive(Clone)]
pub struct AppState {
    pub program_service: Arc<Programs>,
    pub taxonomy_service: Arc<Taxonomies>,
}

impl AppState {
    /// Wires both services over the same repositories and graph lock.
    pub fn new(
        programs: Arc<InMemoryProgramRepository>,
        taxonomy: Arc<InMemoryTaxonomyRepository>,
        invitation_ttl_days: i64,
    ) -> Self {
        let lock = GraphLock::default();

        Self {
            program_service: Arc::new(ProgramService::new(
                programs,
                taxonomy.clone(),
                lock.clone(),
                invitation_ttl_days,
            )),
            taxonomy_service: Arc::new(TaxonomyService::new(taxonomy, lock)),
        }
    }
}
