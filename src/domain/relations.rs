//! Relationship declarations.
//!
//! Every association between domain entities is declared here, once, as a
//! set of accessor functions handed to [`AssociatorFactory`]. Services go
//! through these associators and never edit the collections directly.

use crate::associator::{AssociatorFactory, ManyToManyAssociator, OneToManyAssociator};
use crate::domain::entities::{Invitation, Program, ProgramTerm, TaxonomyKind, TaxonomyTerm};

/// Program → invitations.
pub fn program_invitations() -> OneToManyAssociator<Program, Invitation> {
    AssociatorFactory::one_to_many(
        |program| &mut program.invitations,
        |invitation, program| invitation.program = program.map(|p| p.short_name.clone()),
    )
}

/// Program ↔ taxonomy term of kind `K`, through [`ProgramTerm`].
///
/// Join keys are fixed at creation, so clearing a back-reference leaves a
/// detached join untouched.
pub fn program_terms<K: TaxonomyKind>() -> ManyToManyAssociator<Program, TaxonomyTerm<K>, ProgramTerm<K>> {
    AssociatorFactory::many_to_many(
        K::program_links,
        |join, program| {
            if let Some(program) = program {
                join.program = Some(program.short_name.clone());
            }
        },
        |term| &mut term.programs,
        |join, term| {
            if let Some(term) = term {
                join.term = Some(term.id);
            }
        },
        |program, term| ProgramTerm::new(&program.short_name, term.id),
        |join| join.term.unwrap_or_default(),
    )
}
