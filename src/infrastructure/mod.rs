//! Infrastructure layer for storage and reference data.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - In-memory repository implementations
//! - [`seed`] - Reference taxonomy seed data

pub mod persistence;
pub mod seed;
