//! Identity contract and the keyed entity arena.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{self, Debug, Display};

/// An entity with a stable, comparable identifier.
///
/// `KIND` is the human-readable type name used in association errors.
pub trait Identifiable {
    type Id: Ord + Clone + Debug + Display;

    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}

/// Identity of a join entity: the pair of parent and child identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeId<A, B>(pub A, pub B);

impl<A: Display, B: Display> Display for CompositeId<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Entities of one type keyed by their identifier.
///
/// Iteration follows identifier order, so anything derived from a table is
/// deterministic.
#[derive(Debug, Clone)]
pub struct Table<E: Identifiable> {
    rows: BTreeMap<E::Id, E>,
}

impl<E: Identifiable> Table<E> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Inserts an entity, returning the previous row with the same id.
    pub fn insert(&mut self, entity: E) -> Option<E> {
        self.rows.insert(entity.id(), entity)
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.rows.get(id)
    }

    pub fn get_mut(&mut self, id: &E::Id) -> Option<&mut E> {
        self.rows.get_mut(id)
    }

    pub fn remove(&mut self, id: &E::Id) -> Option<E> {
        self.rows.remove(id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.rows.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &E::Id> {
        self.rows.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.rows.values_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: Identifiable> Default for Table<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Identifiable> FromIterator<E> for Table<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut table = Self::new();
        for entity in iter {
            table.insert(entity);
        }
        table
    }
}

impl<E: Identifiable> Extend<E> for Table<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for entity in iter {
            self.insert(entity);
        }
    }
}

impl<E: Identifiable> IntoIterator for Table<E> {
    type Item = E;
    type IntoIter = btree_map::IntoValues<E::Id, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_values()
    }
}
