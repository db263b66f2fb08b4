//! Relationship consistency for in-memory entity graphs.
//!
//! Keeps both directions of a relationship in step when associations are
//! created or removed:
//!
//! - [`OneToManyAssociator`] - a parent's children and each child's
//!   back-reference
//! - [`ManyToManyAssociator`] - parent and child join collections, composed
//!   from two one-to-many associators around a join entity
//! - [`AssociatorFactory`] - declares a relationship from its accessor
//!   functions
//!
//! Violations surface as [`AssociatorError`]: `Conflict` when an association
//! already exists, `NotFound` when removing associations that do not.
//!
//! Nothing here performs I/O or takes locks. Callers load a consistent
//! snapshot, associate or disassociate, then persist the result inside their
//! own concurrency boundary.

pub mod error;
pub mod factory;
pub mod identity;
pub mod many_to_many;
pub mod one_to_many;

pub use error::AssociatorError;
pub use factory::AssociatorFactory;
pub use identity::{CompositeId, Identifiable, Table};
pub use many_to_many::ManyToManyAssociator;
pub use one_to_many::OneToManyAssociator;
