//! # Dense Store
//!
//! One contiguous, zero-initialized array that holds every slab of a
//! component type back to back.

use bytemuck::Zeroable;
use std::ops::Range;

/// Growable backing array for all slabs of one component type.
///
/// The store only ever grows, and always by doubling. Growing never moves
/// existing elements, so slab offsets stay valid across growth.
#[derive(Clone, Debug)]
pub struct DenseStore<T> {
    /// Every slot of the store; `data.len()` is the store capacity.
    data: Vec<T>,
}

impl<T: Copy + Zeroable> DenseStore<T> {
    /// Creates a store of `capacity` zeroed elements.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero, since a zero store cannot double.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            data: vec![T::zeroed(); capacity],
        }
    }

    /// Total number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Doubles the capacity and returns the previous capacity.
    ///
    /// The new tail `[old, 2 * old)` is zeroed. The caller is expected to
    /// hand it to the free list.
    pub fn grow(&mut self) -> usize {
        let old = self.data.len();
        self.data.resize(old * 2, T::zeroed());
        old
    }

    /// Copies `len` elements from `src` to `dst`; the ranges may overlap.
    #[inline]
    pub fn copy_within(&mut self, src: usize, dst: usize, len: usize) {
        if src != dst && len > 0 {
            self.data.copy_within(src..src + len, dst);
        }
    }

    /// Resets every slot in `range` to zero.
    #[inline]
    pub fn zero(&mut self, range: Range<usize>) {
        self.data[range].fill(T::zeroed());
    }

    /// Whole store as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Whole store as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_doubles_and_keeps_data() {
        let mut store: DenseStore<u32> = DenseStore::new(4);
        store.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);

        assert_eq!(store.grow(), 4);
        assert_eq!(store.capacity(), 8);
        assert_eq!(store.as_slice(), &[1, 2, 3, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn test_copy_within_overlapping() {
        let mut store: DenseStore<u32> = DenseStore::new(6);
        store.as_mut_slice().copy_from_slice(&[1, 2, 3, 4, 0, 0]);

        store.copy_within(0, 2, 4);
        assert_eq!(store.as_slice(), &[1, 2, 1, 2, 3, 4]);

        store.copy_within(2, 0, 4);
        assert_eq!(store.as_slice(), &[1, 2, 3, 4, 3, 4]);
    }

    #[test]
    fn test_zero_range() {
        let mut store: DenseStore<u8> = DenseStore::new(4);
        store.as_mut_slice().copy_from_slice(&[9, 9, 9, 9]);
        store.zero(1..3);
        assert_eq!(store.as_slice(), &[9, 0, 0, 9]);
    }
}
