//! Core domain entities of the program registry.
//!
//! # Entity Types
//!
//! - [`Program`] - A research program, parent of every relationship
//! - [`TaxonomyTerm`] - A reference term (cancer, primary site, country,
//!   institution, region)
//! - [`ProgramTerm`] - Join entity linking a program to a term
//! - [`Invitation`] - A user invited to a program
//!
//! # Design Pattern
//!
//! Separate structs carry creation and update input:
//! - `NewProgram`, `NewInvitation` - For creating new records
//! - `UpdateProgram` - For partial updates

pub mod invitation;
pub mod program;
pub mod taxonomy;

pub use invitation::{Invitation, InvitationStatus, NewInvitation, UserRole};
pub use program::{
    MembershipType, NewProgram, Program, SHORT_NAME_PATTERN, TermNames, UpdateProgram,
};
pub use taxonomy::{
    Cancer, CancerKind, Country, CountryKind, Institution, InstitutionKind, PrimarySite,
    PrimarySiteKind, ProgramCancer, ProgramCountry, ProgramInstitution, ProgramPrimarySite,
    ProgramRegion, ProgramTerm, Region, RegionKind, Taxonomy, TaxonomyKind, TaxonomyTerm,
    TermKind,
};
