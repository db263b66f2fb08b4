//! Domain layer containing business entities and their relationships.
//!
//! # Architecture
//!
//! - [`entities`] - Programs, taxonomy terms, join entities and invitations
//! - [`relations`] - One declaration per relationship, built on
//!   [`crate::associator`]
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Relationship collections change only through [`relations`]
//! - Repository traits define contracts implemented by infrastructure layer

pub mod entities;
pub mod relations;
pub mod repositories;
