//! DTOs for program endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{
    MembershipType, NewProgram, SHORT_NAME_PATTERN, TermNames, UpdateProgram,
};

/// Request to register a program.
///
/// Term lists hold names from the reference taxonomies; unknown names are
/// rejected with 404 and listed per taxonomy.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProgramRequest {
    #[validate(length(min = 2, max = 11))]
    #[validate(regex(path = "*SHORT_NAME_PATTERN"))]
    pub short_name: String,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub description: Option<String>,
    pub membership_type: MembershipType,

    #[validate(range(min = 0))]
    pub commitment_donors: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub submitted_donors: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub genomic_donors: i32,

    #[validate(url)]
    pub website: Option<String>,

    #[serde(default)]
    pub cancer_types: Vec<String>,
    #[serde(default)]
    pub primary_sites: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub institutions: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
}

impl From<CreateProgramRequest> for NewProgram {
    fn from(req: CreateProgramRequest) -> Self {
        NewProgram {
            short_name: req.short_name,
            name: req.name,
            description: req.description,
            membership_type: req.membership_type,
            commitment_donors: req.commitment_donors,
            submitted_donors: req.submitted_donors,
            genomic_donors: req.genomic_donors,
            website: req.website,
            terms: TermNames {
                cancers: req.cancer_types,
                primary_sites: req.primary_sites,
                countries: req.countries,
                institutions: req.institutions,
                regions: req.regions,
            },
        }
    }
}

/// Partial program update. A present term list replaces the current links.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProgramRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub membership_type: Option<MembershipType>,

    #[validate(range(min = 0))]
    pub commitment_donors: Option<i32>,
    #[validate(range(min = 0))]
    pub submitted_donors: Option<i32>,
    #[validate(range(min = 0))]
    pub genomic_donors: Option<i32>,

    #[validate(url)]
    pub website: Option<String>,

    pub cancer_types: Option<Vec<String>>,
    pub primary_sites: Option<Vec<String>>,
    pub countries: Option<Vec<String>>,
    pub institutions: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
}

impl From<UpdateProgramRequest> for UpdateProgram {
    fn from(req: UpdateProgramRequest) -> Self {
        UpdateProgram {
            name: req.name,
            description: req.description,
            membership_type: req.membership_type,
            commitment_donors: req.commitment_donors,
            submitted_donors: req.submitted_donors,
            genomic_donors: req.genomic_donors,
            website: req.website,
            cancers: req.cancer_types,
            primary_sites: req.primary_sites,
            countries: req.countries,
            institutions: req.institutions,
            regions: req.regions,
        }
    }
}

/// A program with the names of its linked terms.
#[derive(Debug, Serialize)]
pub struct ProgramItem {
    pub short_name: String,
    pub name: String,
    pub description: Option<String>,
    pub membership_type: MembershipType,
    pub commitment_donors: i32,
    pub submitted_donors: i32,
    pub genomic_donors: i32,
    pub website: Option<String>,
    pub cancer_types: Vec<String>,
    pub primary_sites: Vec<String>,
    pub countries: Vec<String>,
    pub institutions: Vec<String>,
    pub regions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response containing list of programs.
#[derive(Debug, Serialize)]
pub struct ProgramListResponse {
    pub items: Vec<ProgramItem>,
}
