//! # Free List
//!
//! Tracks the unused regions of a dense store.
//!
//! The list is kept sorted by `start` and coalesced after every release, so
//! its length follows the number of distinct gaps rather than the number of
//! historical releases. Allocation is a linear first-fit scan.

use super::slab::SlabDescriptor;

/// Sorted, coalesced list of free regions.
///
/// The free list only does bookkeeping. Growing the backing store when no
/// region fits is the caller's job (see `BufferStorage`), because the caller
/// owns the store.
#[derive(Clone, Debug, Default)]
pub struct FreeList {
    /// Free regions, ascending by `start`.
    entries: Vec<SlabDescriptor>,
}

impl FreeList {
    /// Creates an empty free list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty free list with room for `capacity` regions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Number of distinct free regions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there is no free region at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Free regions in address order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[SlabDescriptor] {
        &self.entries
    }

    /// Iterates over the free regions in address order.
    pub fn iter(&self) -> impl Iterator<Item = &SlabDescriptor> {
        self.entries.iter()
    }

    /// Sum of all free capacities.
    #[must_use]
    pub fn total_capacity(&self) -> usize {
        self.entries.iter().map(|e| e.capacity).sum()
    }

    /// Capacity of the largest free region, zero if the list is empty.
    #[must_use]
    pub fn largest(&self) -> usize {
        self.entries.iter().map(|e| e.capacity).max().unwrap_or(0)
    }

    /// Returns the index of the first region with at least `size` slots.
    #[must_use]
    pub fn find_fit(&self, size: usize) -> Option<usize> {
        self.entries.iter().position(|e| e.capacity >= size)
    }

    /// Carves `size` slots off the front of the region at `index`.
    ///
    /// The region shrinks from the front, or disappears on an exact fit.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or the region is smaller than `size`.
    pub fn take(&mut self, index: usize, size: usize) -> SlabDescriptor {
        let entry = &mut self.entries[index];
        assert!(
            entry.capacity >= size,
            "free region of {} slots cannot hold {size}",
            entry.capacity
        );

        let slab = SlabDescriptor::free(entry.start, size);

        if entry.capacity > size {
            entry.capacity -= size;
            entry.start += size;
        } else {
            // Keep the relative order; `release` relies on a sorted list.
            self.entries.remove(index);
        }

        slab
    }

    /// Returns a region to the list, merging it with its neighbours.
    ///
    /// Only the region (`start`, `capacity`) matters; `length` is discarded.
    pub fn release(&mut self, slab: SlabDescriptor) {
        if slab.capacity == 0 {
            return;
        }

        debug_assert!(
            self.entries.iter().all(|e| !e.overlaps(&slab)),
            "released region {slab:?} overlaps a free region"
        );

        self.entries.push(SlabDescriptor::free(slab.start, slab.capacity));
        self.entries.sort_unstable_by_key(|e| e.start);
        self.coalesce();
    }

    /// Merges every run of touching regions into one region.
    fn coalesce(&mut self) {
        self.entries.dedup_by(|next, current| {
            if current.touches(next) {
                current.capacity += next.capacity;
                true
            } else {
                false
            }
        });
    }

    /// Returns `true` if the list is sorted and no two regions touch.
    #[must_use]
    pub fn is_coalesced(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].end() < pair[1].start)
    }
}
