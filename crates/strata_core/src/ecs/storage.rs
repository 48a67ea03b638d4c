//! # Buffer Storage
//!
//! Per-component storage for variable-length buffers.
//!
//! Every entity's buffer is a slab inside one dense store:
//! - The sparse index maps an entity to its slab
//! - The free list tracks the gaps between slabs
//! - A full slab relocates to a region twice its size
//! - The store doubles when no free region fits a request

use super::component::Component;
use super::entity::EntityId;
use super::sparse::SparseIndex;
use super::view::BufferView;
use super::world::EntityWorld;
use crate::config::BufferConfig;
use crate::error::{BufferError, BufferResult};
use crate::memory::{DenseStore, FreeList, SlabDescriptor};

/// Allocation statistics for one storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of attached buffers.
    pub buffers: usize,
    /// Dense store capacity in elements.
    pub store_capacity: usize,
    /// Slots owned by attached buffers.
    pub allocated: usize,
    /// Live elements across all buffers.
    pub live: usize,
    /// Slots on the free list.
    pub free: usize,
    /// Number of distinct free regions.
    pub free_regions: usize,
    /// Size of the largest free region.
    pub largest_free: usize,
}

/// Variable-length buffers of component `C`, one per entity.
///
/// The storage exclusively owns its dense store, free list and sparse
/// index. Buffers are accessed through a [`BufferView`], which borrows the
/// storage mutably, so no view can outlive a structural change.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new(1024);
/// let mut waypoints: BufferStorage<Waypoint> = BufferStorage::with_defaults();
///
/// let entity = world.spawn();
/// let mut path = waypoints.add(&mut world, entity, 4)?;
/// path.push(Waypoint::new(0.0, 0.0, 0.0));
/// path.push(Waypoint::new(8.0, 0.0, 2.0));
/// ```
pub struct BufferStorage<C: Component> {
    /// Backing array for every slab.
    pub(super) dense: DenseStore<C>,
    /// Unused regions of `dense`.
    pub(super) free: FreeList,
    /// Entity to slab.
    pub(super) sparse: SparseIndex,
    config: BufferConfig,
    /// Number of attached buffers.
    len: usize,
}

impl<C: Component> BufferStorage<C> {
    /// Creates a storage from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidConfig`] if the configuration fails
    /// [`BufferConfig::validate`].
    pub fn new(config: BufferConfig) -> BufferResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Creates a storage with [`BufferConfig::default`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_valid_config(BufferConfig::default())
    }

    fn from_valid_config(config: BufferConfig) -> Self {
        let () = C::ID_FITS_MASK;

        let dense = DenseStore::new(config.initial_capacity);
        let mut free = FreeList::with_capacity(config.recycled_capacity);
        free.release(SlabDescriptor::free(0, dense.capacity()));

        Self {
            dense,
            free,
            sparse: SparseIndex::new(config.sparse_capacity),
            config,
            len: 0,
        }
    }

    /// Configuration this storage was created with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Number of entities owning a buffer.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entity owns a buffer.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dense store capacity in elements.
    #[inline]
    #[must_use]
    pub fn store_capacity(&self) -> usize {
        self.dense.capacity()
    }

    /// Free regions of the dense store.
    #[inline]
    #[must_use]
    pub const fn free_list(&self) -> &FreeList {
        &self.free
    }

    /// Returns `true` if `entity` owns a buffer.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: EntityId) -> bool {
        self.sparse.contains(entity)
    }

    /// Slab currently backing `entity`'s buffer.
    #[inline]
    #[must_use]
    pub fn slab(&self, entity: EntityId) -> Option<SlabDescriptor> {
        self.sparse.get(entity).copied()
    }

    /// Live elements of `entity`'s buffer, without going through a view.
    #[must_use]
    pub fn buffer(&self, entity: EntityId) -> Option<&[C]> {
        let slab = self.sparse.get(entity)?;
        Some(&self.dense.as_slice()[slab.live()])
    }

    /// Iterates over `(entity key, slab)` pairs in key order.
    pub fn slabs(&self) -> impl Iterator<Item = (usize, SlabDescriptor)> + '_ {
        self.sparse.iter().map(|(owner, slab)| (owner.key(), *slab))
    }

    /// Attaches a buffer with room for `size` elements to `entity`.
    ///
    /// A `size` of zero is rounded up to one.
    ///
    /// # Errors
    ///
    /// With validation enabled, returns [`BufferError::DestroyedEntity`] if
    /// the entity is dead and [`BufferError::DuplicateComponent`] if it
    /// already owns a buffer. Nothing is modified on error. With validation
    /// disabled a second `add` replaces the existing buffer. A buffer left
    /// behind by an older generation of the same entity index is reclaimed.
    pub fn add<W: EntityWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        size: usize,
    ) -> BufferResult<BufferView<'_, C>> {
        self.attach(world, entity, size)?;
        Ok(BufferView::new(self, entity))
    }

    /// Attaches a buffer of the configured default size.
    ///
    /// # Errors
    ///
    /// Same as [`BufferStorage::add`].
    pub fn add_default<W: EntityWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
    ) -> BufferResult<BufferView<'_, C>> {
        let size = self.config.default_buffer_size;
        self.add(world, entity, size)
    }

    /// Attaches a buffer holding a copy of `values`.
    ///
    /// # Errors
    ///
    /// Same as [`BufferStorage::add`].
    pub fn add_from_slice<W: EntityWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        values: &[C],
    ) -> BufferResult<BufferView<'_, C>> {
        let mut view = self.add(world, entity, values.len())?;
        view.extend_from_slice(values);
        Ok(view)
    }

    /// Returns a view over `entity`'s buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::DestroyedEntity`] if validation is enabled and
    /// the entity is dead, and [`BufferError::MissingComponent`] if the
    /// entity owns no buffer.
    pub fn get<W: EntityWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
    ) -> BufferResult<BufferView<'_, C>> {
        if self.config.validation.is_checked() && !world.is_alive(entity) {
            return Err(BufferError::DestroyedEntity { entity });
        }
        if !self.has(entity) {
            return Err(BufferError::MissingComponent {
                entity,
                component: C::ID,
            });
        }
        Ok(BufferView::new(self, entity))
    }

    /// Detaches `entity`'s buffer and returns its region to the free list.
    ///
    /// If the entity is left with no components, the world is asked to
    /// destroy it. Returns `false` if the entity owned no buffer. A stale
    /// handle only detaches the buffer of its own generation.
    pub fn del<W: EntityWorld>(&mut self, world: &mut W, entity: EntityId) -> bool {
        let Some(slab) = self.sparse.remove(entity) else {
            return false;
        };

        self.free.release(slab);
        self.len -= 1;

        let remaining = world.mark_component_removed(entity, C::ID);
        world.on_component_changed(entity, C::ID, false);
        #[cfg(feature = "change-events")]
        world.raise_change_event(entity);

        tracing::trace!(component = C::ID, entity = ?entity, start = slab.start, capacity = slab.capacity, "buffer detached");

        if remaining == 0 && world.is_alive(entity) {
            world.destroy_entity(entity);
        }
        true
    }

    /// Checks the layout invariants of the storage.
    ///
    /// - The free list is sorted and coalesced
    /// - Every slab satisfies `length <= capacity` and fits in the store
    /// - Free regions and slabs tile the store with no gap or overlap
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LayoutViolation`] describing the first broken
    /// invariant.
    pub fn audit(&self) -> BufferResult<()> {
        let capacity = self.dense.capacity();

        if !self.free.is_coalesced() {
            return Err(BufferError::LayoutViolation(
                "free list is not sorted and coalesced".to_string(),
            ));
        }

        let mut regions: Vec<SlabDescriptor> = self.free.iter().copied().collect();
        for (owner, slab) in self.sparse.iter() {
            let key = owner.key();
            if slab.length > slab.capacity {
                return Err(BufferError::LayoutViolation(format!(
                    "entity {key}: length {} exceeds capacity {}",
                    slab.length, slab.capacity
                )));
            }
            if slab.end() > capacity {
                return Err(BufferError::LayoutViolation(format!(
                    "entity {key}: slab ends at {} past store capacity {capacity}",
                    slab.end()
                )));
            }
            regions.push(*slab);
        }

        regions.sort_unstable_by_key(|r| r.start);
        let mut cursor = 0;
        for region in &regions {
            if region.start != cursor {
                return Err(BufferError::LayoutViolation(format!(
                    "region at {} does not continue from offset {cursor}",
                    region.start
                )));
            }
            cursor = region.end();
        }
        if cursor != capacity {
            return Err(BufferError::LayoutViolation(format!(
                "regions cover {cursor} of {capacity} slots"
            )));
        }

        Ok(())
    }

    /// Current allocation statistics.
    #[must_use]
    pub fn stats(&self) -> StorageStats {
        let (allocated, live) = self
            .sparse
            .iter()
            .fold((0, 0), |(allocated, live), (_, slab)| {
                (allocated + slab.capacity, live + slab.length)
            });

        StorageStats {
            buffers: self.len,
            store_capacity: self.dense.capacity(),
            allocated,
            live,
            free: self.free.total_capacity(),
            free_regions: self.free.len(),
            largest_free: self.free.largest(),
        }
    }

    /// Doubles the slab of `entity`, relocating it.
    pub(super) fn resize(&mut self, entity: EntityId) {
        if let Some(slab) = self.sparse.get(entity) {
            let target = (slab.capacity * 2).max(1);
            self.reserve(entity, target);
        }
    }

    /// Grows the slab of `entity` to at least `min_capacity` slots.
    ///
    /// The capacity doubles until it is large enough, then the slab moves
    /// once. Live elements keep their order.
    pub(super) fn reserve(&mut self, entity: EntityId, min_capacity: usize) {
        let Some(&slab) = self.sparse.get(entity) else {
            return;
        };
        if slab.capacity >= min_capacity {
            return;
        }

        let mut target = slab.capacity.max(1);
        while target < min_capacity {
            target *= 2;
        }

        // Releasing first lets the slab extend into its own old region.
        self.free.release(slab);
        let moved = self.allocate(target);
        self.dense.copy_within(slab.start, moved.start, slab.length);

        if let Some(entry) = self.sparse.get_mut(entity) {
            entry.capacity = moved.capacity;
            entry.start = moved.start;
        }

        tracing::debug!(
            component = C::ID,
            entity = ?entity,
            from = slab.start,
            to = moved.start,
            capacity = target,
            "buffer relocated"
        );
    }

    fn attach<W: EntityWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        size: usize,
    ) -> BufferResult<()> {
        if self.config.validation.is_checked() {
            if !world.is_alive(entity) {
                return Err(BufferError::DestroyedEntity { entity });
            }
            if self.sparse.contains(entity) {
                return Err(BufferError::DuplicateComponent {
                    entity,
                    component: C::ID,
                });
            }
        }

        // Reclaims a replaced buffer, or one left by an older generation.
        if let Some((owner, previous)) = self.sparse.evict(entity) {
            self.free.release(previous);
            self.len -= 1;
            if owner != entity {
                tracing::trace!(component = C::ID, stale = ?owner, entity = ?entity, "stale buffer reclaimed");
            }
        }

        if self.free.is_empty() {
            self.grow();
        }
        let slab = self.allocate(size.max(1));
        self.sparse.insert(entity, slab);
        self.len += 1;

        world.mark_component_added(entity, C::ID);
        world.on_component_changed(entity, C::ID, true);
        #[cfg(feature = "change-events")]
        world.raise_change_event(entity);

        tracing::trace!(component = C::ID, entity = ?entity, start = slab.start, capacity = slab.capacity, "buffer attached");
        Ok(())
    }

    /// First-fit allocation, doubling the store until a region fits.
    fn allocate(&mut self, size: usize) -> SlabDescriptor {
        loop {
            if let Some(index) = self.free.find_fit(size) {
                return self.free.take(index, size);
            }
            self.grow();
        }
    }

    /// Doubles the dense store and frees the new tail.
    fn grow(&mut self) {
        let old = self.dense.grow();
        self.free.release(SlabDescriptor::free(old, old));

        tracing::debug!(
            component = C::ID,
            capacity = self.dense.capacity(),
            "dense store grown"
        );
    }
}
