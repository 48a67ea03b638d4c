//! # Buffer View
//!
//! Transient accessor for one entity's buffer.
//!
//! A view stores the entity, not the slab: every access looks the slab
//! up again, so a relocation triggered by the view itself is picked up on
//! the next call.

use bytemuck::Pod;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use super::component::Component;
use super::entity::EntityId;
use super::storage::BufferStorage;
use crate::error::{BufferError, BufferResult};
use crate::memory::SlabDescriptor;

/// Mutable view over the buffer of one entity.
///
/// `C` is the stored element type. `U` is the element type the view exposes;
/// it equals `C` unless the view was created by [`BufferView::reinterpret`].
///
/// Pushing past the capacity relocates the buffer to a slab twice its size.
pub struct BufferView<'a, C: Component, U: Pod = C> {
    storage: &'a mut BufferStorage<C>,
    entity: EntityId,
    _element: PhantomData<U>,
}

impl<'a, C: Component, U: Pod> BufferView<'a, C, U> {
    pub(super) fn new(storage: &'a mut BufferStorage<C>, entity: EntityId) -> Self {
        Self {
            storage,
            entity,
            _element: PhantomData,
        }
    }

    /// Current slab; a view is only created for entities that own one.
    #[inline]
    fn slab(&self) -> SlabDescriptor {
        self.storage
            .sparse
            .get(self.entity)
            .copied()
            .unwrap_or_default()
    }

    fn set_length(&mut self, length: usize) {
        if let Some(slab) = self.storage.sparse.get_mut(self.entity) {
            slab.length = length;
        }
    }

    /// Entity owning the buffer.
    #[inline]
    #[must_use]
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Number of live elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slab().length
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements the buffer holds before relocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slab().capacity
    }

    /// Reads the element at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<U> {
        let slab = self.slab();
        if index >= slab.length {
            return None;
        }
        Some(bytemuck::cast::<C, U>(
            self.storage.dense.as_slice()[slab.start + index],
        ))
    }

    /// Overwrites the element at `index`.
    ///
    /// Returns `false` if `index` is past the end.
    #[inline]
    pub fn set(&mut self, index: usize, value: U) -> bool {
        let slab = self.slab();
        if index >= slab.length {
            return false;
        }
        self.storage.dense.as_mut_slice()[slab.start + index] = bytemuck::cast(value);
        true
    }

    /// Iterates over the live elements.
    pub fn iter(&self) -> impl Iterator<Item = U> + '_ {
        let slab = self.slab();
        self.storage.dense.as_slice()[slab.live()]
            .iter()
            .map(|&value| bytemuck::cast::<C, U>(value))
    }

    /// Copies the live elements into a new `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<U> {
        self.iter().collect()
    }

    /// Appends an element, doubling the capacity first if the buffer is full.
    pub fn push(&mut self, value: U) {
        if self.slab().is_full() {
            self.storage.resize(self.entity);
        }

        let slab = self.slab();
        self.storage.dense.as_mut_slice()[slab.start + slab.length] = bytemuck::cast(value);
        self.set_length(slab.length + 1);
    }

    /// Appends all of `values`.
    ///
    /// The capacity doubles as many times as needed, then the buffer moves
    /// at most once.
    pub fn extend_from_slice(&mut self, values: &[U]) {
        if values.is_empty() {
            return;
        }

        let length = self.len();
        self.storage.reserve(self.entity, length + values.len());

        let slab = self.slab();
        let at = slab.start + slab.length;
        let dst = &mut self.storage.dense.as_mut_slice()[at..at + values.len()];
        for (slot, &value) in dst.iter_mut().zip(values) {
            *slot = bytemuck::cast(value);
        }
        self.set_length(slab.length + values.len());
    }

    /// Makes room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        let length = self.len();
        self.storage.reserve(self.entity, length + additional);
    }

    /// Removes the element at `index`, shifting the tail down.
    pub fn remove_at(&mut self, index: usize) {
        self.remove_range(index, 1);
    }

    /// Removes `count` elements starting at `index`, shifting the tail down.
    ///
    /// `count` is clamped to the end of the buffer; an `index` past the end
    /// removes nothing. Vacated slots are zeroed.
    pub fn remove_range(&mut self, index: usize, count: usize) {
        let slab = self.slab();
        if index >= slab.length || count == 0 {
            return;
        }

        let count = count.min(slab.length - index);
        let tail = index + count;
        let new_length = slab.length - count;

        self.storage
            .dense
            .copy_within(slab.start + tail, slab.start + index, slab.length - tail);
        self.storage
            .dense
            .zero(slab.start + new_length..slab.start + slab.length);
        self.set_length(new_length);
    }

    /// Shortens the buffer to `length` elements. Capacity is unchanged.
    pub fn truncate(&mut self, length: usize) {
        let current = self.len();
        if length < current {
            self.remove_range(length, current - length);
        }
    }

    /// Removes every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Views the same buffer as elements of type `V`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::IncompatibleReinterpret`] if `U` and `V` differ
    /// in size.
    pub fn reinterpret<V: Pod>(self) -> BufferResult<BufferView<'a, C, V>> {
        let (from, to) = (std::mem::size_of::<U>(), std::mem::size_of::<V>());
        if from != to {
            return Err(BufferError::IncompatibleReinterpret { from, to });
        }
        Ok(BufferView::new(self.storage, self.entity))
    }
}

impl<'a, C: Component> BufferView<'a, C> {
    /// Live elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        let slab = self.slab();
        &self.storage.dense.as_slice()[slab.live()]
    }

    /// Live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        let slab = self.slab();
        &mut self.storage.dense.as_mut_slice()[slab.live()]
    }
}

impl<C: Component> Index<usize> for BufferView<'_, C> {
    type Output = C;

    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn index(&self, index: usize) -> &C {
        &self.as_slice()[index]
    }
}

impl<C: Component> IndexMut<usize> for BufferView<'_, C> {
    fn index_mut(&mut self, index: usize) -> &mut C {
        &mut self.as_mut_slice()[index]
    }
}

impl<C: Component, U: Pod + fmt::Debug> fmt::Debug for BufferView<'_, C, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferView")
            .field("entity", &self.entity)
            .field("slab", &self.slab())
            .field("elements", &self.to_vec())
            .finish()
    }
}
