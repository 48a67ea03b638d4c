//! # Sparse Index
//!
//! Maps entities to the slab that holds their buffer.
//!
//! The index is a plain array addressed by entity key:
//! - Lookup is O(1)
//! - Absent entries are `None`
//! - Each entry remembers its owner, so a recycled key with a newer
//!   generation does not see the old entity's slab
//! - The array grows by doubling when a larger key shows up

use super::entity::EntityId;
use crate::memory::SlabDescriptor;

/// Entity to slab descriptor table.
#[derive(Clone, Debug, Default)]
pub struct SparseIndex {
    /// One entry per entity key: the owning entity and its slab.
    entries: Vec<Option<(EntityId, SlabDescriptor)>>,
}

impl SparseIndex {
    /// Creates an index with `capacity` absent entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![None; capacity],
        }
    }

    /// Number of addressable keys.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Gets the descriptor owned by `entity`.
    ///
    /// An entry left behind by an older generation of the same key is
    /// treated as absent.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&SlabDescriptor> {
        match self.entries.get(entity.key())? {
            Some((owner, slab)) if *owner == entity => Some(slab),
            _ => None,
        }
    }

    /// Gets the descriptor owned by `entity`, mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut SlabDescriptor> {
        match self.entries.get_mut(entity.key())? {
            Some((owner, slab)) if *owner == entity => Some(slab),
            _ => None,
        }
    }

    /// Returns `true` if `entity` owns a descriptor.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.get(entity).is_some()
    }

    /// Stores `slab` for `entity`, growing the index if needed.
    ///
    /// Returns whatever was stored under the same key, whichever generation
    /// owned it.
    pub fn insert(
        &mut self,
        entity: EntityId,
        slab: SlabDescriptor,
    ) -> Option<(EntityId, SlabDescriptor)> {
        let key = entity.key();
        if key >= self.entries.len() {
            let capacity = (self.entries.len() * 2).max(key + 1);
            self.entries.resize(capacity, None);
        }
        self.entries[key].replace((entity, slab))
    }

    /// Clears the entry owned by `entity` and returns its descriptor.
    ///
    /// Entries owned by another generation are left alone.
    pub fn remove(&mut self, entity: EntityId) -> Option<SlabDescriptor> {
        let entry = self.entries.get_mut(entity.key())?;
        if entry.is_some_and(|(owner, _)| owner == entity) {
            entry.take().map(|(_, slab)| slab)
        } else {
            None
        }
    }

    /// Clears the entry at `entity`'s key, whichever generation owns it.
    pub fn evict(&mut self, entity: EntityId) -> Option<(EntityId, SlabDescriptor)> {
        self.entries.get_mut(entity.key())?.take()
    }

    /// Iterates over present entries with their owners, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &SlabDescriptor)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.as_ref().map(|(owner, slab)| (*owner, slab)))
    }
}
