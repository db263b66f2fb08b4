//! Program entity: the parent record every other relationship hangs off.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::associator::Identifiable;
use crate::domain::entities::invitation::Invitation;
use crate::domain::entities::taxonomy::{
    ProgramCancer, ProgramCountry, ProgramInstitution, ProgramPrimarySite, ProgramRegion,
};

/// Program short name: uppercase letters and digits with inner dashes, e.g. `PACA-CA`.
pub static SHORT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]*[A-Z0-9]$").unwrap());

/// Membership level of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipType {
    Full,
    Associate,
}

/// A research program with its taxonomy links and pending invitations.
///
/// Identified by its short name (e.g. `PACA-CA`). The join collections are
/// owned here and mirrored on each taxonomy term; they are only ever changed
/// through [`crate::domain::relations`].
#[derive(Debug, Clone)]
pub struct Program {
    pub short_name: String,
    pub name: String,
    pub description: Option<String>,
    pub membership_type: MembershipType,
    pub commitment_donors: i32,
    pub submitted_donors: i32,
    pub genomic_donors: i32,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancers: Vec<ProgramCancer>,
    pub primary_sites: Vec<ProgramPrimarySite>,
    pub countries: Vec<ProgramCountry>,
    pub institutions: Vec<ProgramInstitution>,
    pub regions: Vec<ProgramRegion>,
    pub invitations: Vec<Invitation>,
}

impl Program {
    /// Creates a program with no links.
    pub fn new(
        short_name: String,
        name: String,
        membership_type: MembershipType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            short_name,
            name,
            description: None,
            membership_type,
            commitment_donors: 0,
            submitted_donors: 0,
            genomic_donors: 0,
            website: None,
            created_at,
            updated_at: created_at,
            cancers: Vec::new(),
            primary_sites: Vec::new(),
            countries: Vec::new(),
            institutions: Vec::new(),
            regions: Vec::new(),
            invitations: Vec::new(),
        }
    }

    /// Returns true if the program holds no taxonomy links and no invitations.
    pub fn is_detached(&self) -> bool {
        self.cancers.is_empty()
            && self.primary_sites.is_empty()
            && self.countries.is_empty()
            && self.institutions.is_empty()
            && self.regions.is_empty()
            && self.invitations.is_empty()
    }
}

impl Identifiable for Program {
    type Id = String;
    const KIND: &'static str = "Program";

    fn id(&self) -> String {
        self.short_name.clone()
    }
}

/// Reference term names attached to a program, one list per taxonomy.
#[derive(Debug, Clone, Default)]
pub struct TermNames {
    pub cancers: Vec<String>,
    pub primary_sites: Vec<String>,
    pub countries: Vec<String>,
    pub institutions: Vec<String>,
    pub regions: Vec<String>,
}

/// Input data for creating a program.
#[derive(Debug, Clone)]
pub struct NewProgram {
    pub short_name: String,
    pub name: String,
    pub description: Option<String>,
    pub membership_type: MembershipType,
    pub commitment_donors: i32,
    pub submitted_donors: i32,
    pub genomic_donors: i32,
    pub website: Option<String>,
    pub terms: TermNames,
}

/// Partial update for an existing program.
///
/// `None` fields are left unchanged. A `Some` term list replaces the current
/// links of that taxonomy.
#[derive(Debug, Clone, Default)]
pub struct UpdateProgram {
    pub name: Option<String>,
    pub description: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub commitment_donors: Option<i32>,
    pub submitted_donors: Option<i32>,
    pub genomic_donors: Option<i32>,
    pub website: Option<String>,
    pub cancers: Option<Vec<String>>,
    pub primary_sites: Option<Vec<String>>,
    pub countries: Option<Vec<String>>,
    pub institutions: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
}
