//! # Program Service
//!
//! Administration backend for research programs: program records, their links
//! to reference taxonomies, and user invitations.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Associator** ([`associator`]) - Generic bidirectional relationship engine
//! - **Domain Layer** ([`domain`]) - Entities, relationship declarations and repository traits
//! - **Application Layer** ([`application`]) - Business logic and service orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory stores and taxonomy seed data
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Programs linked to cancers, primary sites, countries, institutions and regions,
//!   with both sides of every link kept in step
//! - Invitations owned by programs, with revocation, acceptance and expiry
//! - Errors that name every missing id at once
//!
//! ## Quick Start
//!
//! ```bash
//! export LISTEN="127.0.0.1:3000"
//! export TAXONOMY_SEED="./taxonomy.json"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod associator;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ProgramService, TaxonomyService};
    pub use crate::associator::{AssociatorError, AssociatorFactory, Identifiable, Table};
    pub use crate::domain::entities::{Invitation, NewInvitation, NewProgram, Program, Taxonomy};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
