use std::{
    fmt,
    hash::{Hash, Hasher},
};

use fixedbitset::FixedBitSet;

use crate::ecs::component::Id;

/// The set of component types held by an entity or an archetype, one bit per registered
/// component id. All signatures of one world share the same width.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    bits: FixedBitSet,
}

impl Signature {
    /// An empty signature able to hold component ids below `width`.
    #[inline]
    pub fn new(width: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(width),
        }
    }

    /// Build a signature with the given ids set.
    ///
    /// # Panics
    ///
    /// Panics if an id does not fit in `width`.
    pub fn from_ids(width: usize, ids: impl IntoIterator<Item = Id>) -> Self {
        let mut signature = Self::new(width);
        for id in ids {
            signature.insert(id);
        }
        signature
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Set the bit for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not fit in this signature's width.
    #[inline]
    pub fn insert(&mut self, id: Id) {
        self.bits.insert(id.index());
    }

    /// Clear the bit for `id`. Ids outside the width are already clear.
    #[inline]
    pub fn remove(&mut self, id: Id) {
        if id.index() < self.bits.len() {
            self.bits.set(id.index(), false);
        }
    }

    /// Clear every bit.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.bits.contains(id.index())
    }

    /// True if every bit of `other` is also set here.
    #[inline]
    pub fn contains_all(&self, other: &Signature) -> bool {
        self.bits.is_superset(&other.bits)
    }

    /// True if at least one bit of `other` is also set here.
    #[inline]
    pub fn contains_any(&self, other: &Signature) -> bool {
        !self.bits.is_disjoint(&other.bits)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// The set component ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.bits.ones().map(Id::from)
    }
}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.len().hash(state);
        for index in self.bits.ones() {
            index.hash(state);
        }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.ones()).finish()
    }
}
