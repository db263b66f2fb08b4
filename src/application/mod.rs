//! Application layer services implementing business logic.
//!
//! Services load programs and taxonomy snapshots from repository traits,
//! change relationships through [`crate::domain::relations`], and store the
//! result. HTTP handlers only talk to services.
//!
//! # Available Services
//!
//! - [`services::program_service::ProgramService`] - Programs, term links and invitations
//! - [`services::taxonomy_service::TaxonomyService`] - Taxonomy listings and institutions

pub mod services;
