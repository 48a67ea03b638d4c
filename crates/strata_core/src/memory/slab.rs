//! # Slab Descriptor
//!
//! A slab is one contiguous region of a dense store, described by where it
//! starts, how many elements it can hold and how many are currently live.

use std::ops::Range;

/// Describes one contiguous region of a dense store.
///
/// The same type is used for allocated slabs (owned by an entity) and for
/// free regions tracked by the [`FreeList`](super::FreeList), where `length`
/// is always zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SlabDescriptor {
    /// Number of elements the region can hold.
    pub capacity: usize,
    /// Number of live elements, always `<= capacity`.
    pub length: usize,
    /// Offset of the first element in the dense store.
    pub start: usize,
}

impl SlabDescriptor {
    /// The all-zero descriptor.
    pub const EMPTY: Self = Self {
        capacity: 0,
        length: 0,
        start: 0,
    };

    /// Creates an empty region of `capacity` elements at `start`.
    #[inline]
    #[must_use]
    pub const fn free(start: usize, capacity: usize) -> Self {
        Self {
            capacity,
            length: 0,
            start,
        }
    }

    /// Offset one past the last element of the region.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.capacity
    }

    /// Number of unused slots left in the region.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity - self.length
    }

    /// Returns `true` if no more elements fit without relocating.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.length == self.capacity
    }

    /// Whole region as a dense store range.
    #[inline]
    #[must_use]
    pub const fn region(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Live elements as a dense store range.
    #[inline]
    #[must_use]
    pub const fn live(&self) -> Range<usize> {
        self.start..self.start + self.length
    }

    /// Returns `true` if `next` begins exactly where this region ends.
    #[inline]
    #[must_use]
    pub const fn touches(&self, next: &Self) -> bool {
        self.end() == next.start
    }

    /// Returns `true` if the two regions share at least one slot.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(SlabDescriptor::default(), SlabDescriptor::EMPTY);
    }

    #[test]
    fn test_ranges() {
        let slab = SlabDescriptor {
            capacity: 8,
            length: 3,
            start: 4,
        };
        assert_eq!(slab.end(), 12);
        assert_eq!(slab.region(), 4..12);
        assert_eq!(slab.live(), 4..7);
        assert_eq!(slab.remaining(), 5);
        assert!(!slab.is_full());
    }

    #[test]
    fn test_adjacency() {
        let a = SlabDescriptor::free(0, 4);
        let b = SlabDescriptor::free(4, 4);
        let c = SlabDescriptor::free(6, 4);

        assert!(a.touches(&b));
        assert!(!b.touches(&a));
        assert!(!a.overlaps(&b));
        assert!(b.overlaps(&c));
    }
}
