//! # Entity Identifiers
//!
//! Entities are generational handles. The index part keys every sparse
//! index, the generation part lets a world reject stale handles.

/// Unique identifier for an entity.
///
/// - Lower 32 bits: slot index, used as the sparse index key
/// - Upper 32 bits: generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a new entity ID from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Creates a first-generation ID for `index`.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self::new(index, 0)
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Sparse index key of this entity.
    #[inline]
    #[must_use]
    pub const fn key(self) -> usize {
        self.index() as usize
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}
