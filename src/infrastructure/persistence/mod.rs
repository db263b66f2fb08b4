//! In-memory repository implementations.
//!
//! Concrete implementations of the domain repository traits backed by
//! `tokio::sync::RwLock`-guarded tables.
//!
//! # Repositories
//!
//! - [`InMemoryProgramRepository`] - Programs with their links and invitations
//! - [`InMemoryTaxonomyRepository`] - Reference taxonomy snapshot

pub mod memory_program_repository;
pub mod memory_taxonomy_repository;

pub use memory_program_repository::InMemoryProgramRepository;
pub use memory_taxonomy_repository::InMemoryTaxonomyRepository;
