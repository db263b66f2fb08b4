//! Parent ↔ child relationship carried by join entities.
//!
//! Each association is a join entity stored on both sides: in the parent's
//! join collection and in the child's. The associator composes two
//! [`OneToManyAssociator`]s (parent → join, child → join) and is the only
//! place that touches either collection, so both views change together.

use std::collections::BTreeSet;

use tracing::debug;

use super::error::AssociatorError;
use super::identity::{Identifiable, Table};
use super::one_to_many::OneToManyAssociator;

/// Builds the join entity for a (parent, child) pair.
pub type CreateJoinFn<P, C, J> = fn(&P, &C) -> J;

/// Extracts the key of the child a join entity points at.
pub type JoinChildFn<C, J> = fn(&J) -> <C as Identifiable>::Id;

pub struct ManyToManyAssociator<P, C, J>
where
    C: Identifiable,
{
    parent_side: OneToManyAssociator<P, J>,
    child_side: OneToManyAssociator<C, J>,
    create_join: CreateJoinFn<P, C, J>,
    child_of_join: JoinChildFn<C, J>,
}

impl<P, C: Identifiable, J> Clone for ManyToManyAssociator<P, C, J> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C: Identifiable, J> Copy for ManyToManyAssociator<P, C, J> {}

impl<P, C, J> ManyToManyAssociator<P, C, J>
where
    P: Identifiable,
    C: Identifiable,
    J: Identifiable + Clone,
{
    pub fn new(
        parent_side: OneToManyAssociator<P, J>,
        child_side: OneToManyAssociator<C, J>,
        create_join: CreateJoinFn<P, C, J>,
        child_of_join: JoinChildFn<C, J>,
    ) -> Self {
        Self {
            parent_side,
            child_side,
            create_join,
            child_of_join,
        }
    }

    /// Keys of the children currently associated with `parent`, sorted.
    pub fn children_of(&self, parent: &mut P) -> Vec<C::Id> {
        self.parent_side
            .collection(parent)
            .iter()
            .map(self.child_of_join)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns true if `parent` and `child` are currently associated.
    pub fn is_associated(&self, parent: &mut P, child: &C) -> bool {
        let child_id = child.id();
        self.parent_side
            .collection(parent)
            .iter()
            .any(|join| (self.child_of_join)(join) == child_id)
    }

    /// Links `parent` and `child` through a new join entity.
    ///
    /// Both sides are checked before either is mutated.
    ///
    /// # Errors
    ///
    /// Returns [`AssociatorError::Conflict`] if the join already exists on
    /// either side.
    pub fn associate<'p>(&self, parent: &'p mut P, child: &mut C) -> Result<&'p mut P, AssociatorError> {
        let join = (self.create_join)(&*parent, &*child);
        let join_id = join.id();

        if self.parent_side.contains(parent, &join_id) {
            return Err(AssociatorError::conflict::<P, J>(&*parent, &join_id));
        }
        if self.child_side.contains(child, &join_id) {
            return Err(AssociatorError::conflict::<C, J>(&*child, &join_id));
        }

        self.parent_side.associate(&mut *parent, join.clone())?;
        self.child_side.associate(child, join)?;

        Ok(parent)
    }

    /// Associates each child in input order.
    ///
    /// Earlier children stay associated when a later one conflicts.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssociatorError::Conflict`] encountered.
    pub fn associate_all<'p, 'c, I>(&self, parent: &'p mut P, children: I) -> Result<&'p mut P, AssociatorError>
    where
        I: IntoIterator<Item = &'c mut C>,
        C: 'c,
    {
        for child in children {
            self.associate(&mut *parent, child)?;
        }
        Ok(parent)
    }

    /// Unlinks `parent` from the children with the given keys.
    ///
    /// Children are resolved in `children`, the caller's arena. All checks run
    /// before any join is removed.
    ///
    /// # Errors
    ///
    /// Returns [`AssociatorError::NotFound`] listing every requested key that
    /// is not associated with `parent`, or that is associated but absent from
    /// the arena.
    pub fn disassociate<'p>(
        &self,
        parent: &'p mut P,
        children: &mut Table<C>,
        child_ids: &[C::Id],
    ) -> Result<&'p mut P, AssociatorError> {
        let requested: BTreeSet<&C::Id> = child_ids.iter().collect();
        let existing: BTreeSet<C::Id> = self.children_of(parent).into_iter().collect();

        let missing: Vec<&C::Id> = requested
            .iter()
            .copied()
            .filter(|id| !existing.contains(*id))
            .collect();
        if !missing.is_empty() {
            return Err(AssociatorError::not_found(&*parent, C::KIND, missing));
        }

        let unresolved: Vec<&C::Id> = requested
            .iter()
            .copied()
            .filter(|id| !children.contains(*id))
            .collect();
        if !unresolved.is_empty() {
            return Err(AssociatorError::not_found(&*parent, C::KIND, unresolved));
        }

        let doomed: Vec<(J::Id, C::Id)> = self
            .parent_side
            .collection(parent)
            .iter()
            .filter_map(|join| {
                let child_id = (self.child_of_join)(join);
                requested
                    .contains(&child_id)
                    .then(|| (join.id(), child_id))
            })
            .collect();

        for (join_id, child_id) in &doomed {
            if let Some(child) = children.get_mut(child_id)
                && !self.child_side.contains(child, join_id)
            {
                return Err(AssociatorError::not_found(
                    &*child,
                    J::KIND,
                    std::iter::once(join_id),
                ));
            }
        }

        for (join_id, child_id) in &doomed {
            if let Some(child) = children.get_mut(child_id) {
                self.child_side
                    .disassociate(child, std::slice::from_ref(join_id))?;
            }
        }

        let join_ids: Vec<J::Id> = doomed.into_iter().map(|(join_id, _)| join_id).collect();
        let removed = self.parent_side.disassociate(&mut *parent, &join_ids)?;

        debug!(
            parent_kind = P::KIND,
            parent_id = %parent.id(),
            child_kind = C::KIND,
            count = removed.len(),
            "Removed join entities"
        );

        Ok(parent)
    }

    /// Applies [`Self::disassociate`] to each parent independently.
    ///
    /// Returns one outcome per parent, in input order; there is no
    /// atomicity across the batch.
    pub fn disassociate_each<'a, I>(
        &self,
        parents: I,
        children: &mut Table<C>,
        child_ids: &[C::Id],
    ) -> Vec<Result<(), AssociatorError>>
    where
        I: IntoIterator<Item = &'a mut P>,
        P: 'a,
    {
        let mut outcomes = Vec::new();
        for parent in parents {
            outcomes.push(self.disassociate(parent, children, child_ids).map(|_| ()));
        }
        outcomes
    }
}
