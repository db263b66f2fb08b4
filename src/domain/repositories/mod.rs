//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`ProgramRepository`] - Programs with their links and invitations
//! - [`TaxonomyRepository`] - Reference taxonomy snapshots

pub mod program_repository;
pub mod taxonomy_repository;

pub use program_repository::ProgramRepository;
pub use taxonomy_repository::TaxonomyRepository;

#[cfg(test)]
pub use program_repository::MockProgramRepository;
#[cfg(test)]
pub use taxonomy_repository::MockTaxonomyRepository;
