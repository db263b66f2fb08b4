//! Builds associators from plain accessor functions.
//!
//! A concrete relationship is declared once, at a single call site, as the set
//! of functions that reach into its entities:
//!
//! ```rust,ignore
//! let invitations = AssociatorFactory::one_to_many(
//!     |program: &mut Program| &mut program.invitations,
//!     |invitation, program| invitation.program = program.map(|p| p.short_name.clone()),
//! );
//! ```

use super::identity::Identifiable;
use super::many_to_many::{CreateJoinFn, JoinChildFn, ManyToManyAssociator};
use super::one_to_many::{ChildrenFn, LinkFn, OneToManyAssociator};

pub struct AssociatorFactory;

impl AssociatorFactory {
    /// Parent → children relationship from the children accessor and the
    /// back-reference setter.
    pub fn one_to_many<P, C>(children: ChildrenFn<P, C>, link: LinkFn<P, C>) -> OneToManyAssociator<P, C>
    where
        P: Identifiable,
        C: Identifiable,
    {
        OneToManyAssociator::new(children, link)
    }

    /// Parent ↔ child relationship through join entities.
    ///
    /// Builds the parent → join and child → join associators and composes
    /// them.
    pub fn many_to_many<P, C, J>(
        parent_joins: ChildrenFn<P, J>,
        link_join_to_parent: LinkFn<P, J>,
        child_joins: ChildrenFn<C, J>,
        link_join_to_child: LinkFn<C, J>,
        create_join: CreateJoinFn<P, C, J>,
        child_of_join: JoinChildFn<C, J>,
    ) -> ManyToManyAssociator<P, C, J>
    where
        P: Identifiable,
        C: Identifiable,
        J: Identifiable + Clone,
    {
        ManyToManyAssociator::new(
            Self::one_to_many(parent_joins, link_join_to_parent),
            Self::one_to_many(child_joins, link_join_to_child),
            create_join,
            child_of_join,
        )
    }
}
