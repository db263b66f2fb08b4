//! Parent → children relationship with a back-reference on each child.

use std::collections::BTreeSet;

use tracing::debug;

use super::error::AssociatorError;
use super::identity::Identifiable;

/// Returns the parent's owned children collection.
pub type ChildrenFn<P, C> = fn(&mut P) -> &mut Vec<C>;

/// Points a child at its parent, or severs the reference when given `None`.
pub type LinkFn<P, C> = fn(&mut C, Option<&P>);

/// Keeps a parent's children and each child's back-reference in step.
///
/// Children are owned by the parent's collection. Associating moves a child
/// in; disassociating hands detached children back to the caller with their
/// back-reference cleared.
pub struct OneToManyAssociator<P, C> {
    children: ChildrenFn<P, C>,
    link: LinkFn<P, C>,
}

impl<P, C> Clone for OneToManyAssociator<P, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C> Copy for OneToManyAssociator<P, C> {}

impl<P, C> OneToManyAssociator<P, C>
where
    P: Identifiable,
    C: Identifiable,
{
    pub fn new(children: ChildrenFn<P, C>, link: LinkFn<P, C>) -> Self {
        Self { children, link }
    }

    pub fn collection<'p>(&self, parent: &'p mut P) -> &'p mut Vec<C> {
        (self.children)(parent)
    }

    /// Returns true if a child with `child_id` is in the parent's collection.
    pub fn contains(&self, parent: &mut P, child_id: &C::Id) -> bool {
        (self.children)(parent).iter().any(|c| &c.id() == child_id)
    }

    /// Identifiers of the parent's current children, in collection order.
    pub fn child_ids(&self, parent: &mut P) -> Vec<C::Id> {
        (self.children)(parent).iter().map(Identifiable::id).collect()
    }

    /// Adds `child` to the parent and points it back at the parent.
    ///
    /// # Errors
    ///
    /// Returns [`AssociatorError::Conflict`] if a child with the same id is
    /// already present. The graph is left untouched in that case.
    pub fn associate<'p>(&self, parent: &'p mut P, mut child: C) -> Result<&'p mut P, AssociatorError> {
        let child_id = child.id();
        if self.contains(parent, &child_id) {
            return Err(AssociatorError::conflict::<P, C>(&*parent, &child_id));
        }

        (self.link)(&mut child, Some(&*parent));
        (self.children)(parent).push(child);

        debug!(
            parent_kind = P::KIND,
            parent_id = %parent.id(),
            child_kind = C::KIND,
            child_id = %child_id,
            "Associated"
        );

        Ok(parent)
    }

    /// Associates each child in input order.
    ///
    /// The batch is not pre-checked: when child *k* conflicts, children
    /// before it stay associated.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssociatorError::Conflict`] encountered.
    pub fn associate_all<'p, I>(&self, parent: &'p mut P, children: I) -> Result<&'p mut P, AssociatorError>
    where
        I: IntoIterator<Item = C>,
    {
        for child in children {
            self.associate(&mut *parent, child)?;
        }
        Ok(parent)
    }

    /// Removes the children with the given ids and returns them detached.
    ///
    /// Every requested id is checked before anything is removed.
    ///
    /// # Errors
    ///
    /// Returns [`AssociatorError::NotFound`] naming every requested id that is
    /// not among the parent's children, sorted.
    pub fn disassociate(&self, parent: &mut P, child_ids: &[C::Id]) -> Result<Vec<C>, AssociatorError> {
        let requested: BTreeSet<&C::Id> = child_ids.iter().collect();
        let existing: BTreeSet<C::Id> = self.child_ids(parent).into_iter().collect();

        let missing: Vec<&C::Id> = requested
            .iter()
            .copied()
            .filter(|id| !existing.contains(*id))
            .collect();
        if !missing.is_empty() {
            return Err(AssociatorError::not_found(&*parent, C::KIND, missing));
        }

        let children = (self.children)(parent);
        let (mut detached, kept): (Vec<C>, Vec<C>) = children
            .drain(..)
            .partition(|c| requested.contains(&c.id()));
        *children = kept;

        for child in &mut detached {
            (self.link)(child, None);
        }

        debug!(
            parent_kind = P::KIND,
            parent_id = %parent.id(),
            child_kind = C::KIND,
            count = detached.len(),
            "Disassociated"
        );

        Ok(detached)
    }

    /// Applies [`Self::disassociate`] to each parent independently.
    ///
    /// Returns one outcome per parent, in input order. A failure on one parent
    /// neither stops the batch nor rolls back parents already processed.
    pub fn disassociate_each<'a, I>(
        &self,
        parents: I,
        child_ids: &[C::Id],
    ) -> Vec<Result<Vec<C>, AssociatorError>>
    where
        I: IntoIterator<Item = &'a mut P>,
        P: 'a,
    {
        parents
            .into_iter()
            .map(|parent| self.disassociate(parent, child_ids))
            .collect()
    }
}
