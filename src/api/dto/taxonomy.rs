//! DTOs for taxonomy endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::TermSummary;

/// A taxonomy term and the programs linked to it.
#[derive(Debug, Serialize)]
pub struct TermItem {
    pub id: i64,
    pub name: String,
    pub programs: Vec<String>,
}

impl From<TermSummary> for TermItem {
    fn from(t: TermSummary) -> Self {
        TermItem {
            id: t.id,
            name: t.name,
            programs: t.programs,
        }
    }
}

/// Response containing the terms of one taxonomy.
#[derive(Debug, Serialize)]
pub struct TermListResponse {
    pub kind: String,
    pub items: Vec<TermItem>,
}

/// Request to register institutions.
#[derive(Debug, Deserialize, Validate)]
pub struct AddInstitutionsRequest {
    #[validate(length(min = 1, max = 100))]
    pub names: Vec<String>,
}
