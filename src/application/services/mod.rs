//! Business logic services for the application layer.

use std::sync::Arc;
use tokio::sync::Mutex;

pub mod program_service;
pub mod taxonomy_service;

pub use program_service::ProgramService;
pub use taxonomy_service::{TaxonomyService, TermSummary};

/// Serializes changes to the program/taxonomy graph.
///
/// Both sides of a relationship are loaded, mutated and stored as a unit, so
/// every service that writes links must hold the same lock.
pub type GraphLock = Arc<Mutex<()>>;
