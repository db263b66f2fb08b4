//! Reference taxonomy service.

use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::application::services::GraphLock;
use crate::domain::entities::{
    CancerKind, CountryKind, Institution, InstitutionKind, PrimarySiteKind, RegionKind, Taxonomy,
    TaxonomyKind, TermKind,
};
use crate::domain::repositories::TaxonomyRepository;
use crate::error::AppError;

/// A term with the short names of the programs linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSummary {
    pub id: i64,
    pub name: String,
    pub programs: Vec<String>,
}

/// Read access to the taxonomies plus institution registration.
pub struct TaxonomyService<T: TaxonomyRepository> {
    repository: Arc<T>,
    lock: GraphLock,
}

impl<T: TaxonomyRepository> TaxonomyService<T> {
    pub fn new(repository: Arc<T>, lock: GraphLock) -> Self {
        Self { repository, lock }
    }

    /// Lists every term of one taxonomy, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list(&self, kind: TermKind) -> Result<Vec<TermSummary>, AppError> {
        let mut taxonomy = self.repository.load().await?;

        Ok(match kind {
            TermKind::Cancers => summarize::<CancerKind>(&mut taxonomy),
            TermKind::PrimarySites => summarize::<PrimarySiteKind>(&mut taxonomy),
            TermKind::Countries => summarize::<CountryKind>(&mut taxonomy),
            TermKind::Institutions => summarize::<InstitutionKind>(&mut taxonomy),
            TermKind::Regions => summarize::<RegionKind>(&mut taxonomy),
        })
    }

    /// Registers new institutions.
    ///
    /// Names are trimmed and deduplicated. Either every name is added or none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the list is empty or holds a blank name.
    /// Returns [`AppError::Conflict`] listing every name already registered.
    pub async fn add_institutions(&self, names: &[String]) -> Result<Vec<TermSummary>, AppError> {
        let mut seen = BTreeSet::new();
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| seen.insert(*n))
            .collect();

        if names.is_empty() || names.iter().any(|n| n.is_empty()) {
            return Err(AppError::bad_request(
                "Institution names must not be empty",
                json!({ "names": names }),
            ));
        }

        let _guard = self.lock.lock().await;
        let mut taxonomy = self.repository.load().await?;

        let existing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| taxonomy.institutions.iter().any(|i| i.name == *name))
            .collect();
        if !existing.is_empty() {
            return Err(AppError::conflict(
                "Institutions already exist",
                json!({ "names": existing }),
            ));
        }

        let mut added = Vec::with_capacity(names.len());
        for name in names {
            let id = taxonomy.next_id::<InstitutionKind>();
            taxonomy.institutions.insert(Institution::new(id, name));
            added.push(TermSummary {
                id,
                name: name.to_string(),
                programs: Vec::new(),
            });
        }

        self.repository.store(taxonomy).await?;

        info!(count = added.len(), "Institutions added");
        Ok(added)
    }
}

fn summarize<K: TaxonomyKind>(taxonomy: &mut Taxonomy) -> Vec<TermSummary> {
    K::table(taxonomy)
        .iter()
        .map(|term| TermSummary {
            id: term.id,
            name: term.name.clone(),
            programs: term.program_short_names(),
        })
        .collect()
}
