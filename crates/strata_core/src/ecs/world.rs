//! # Entity World
//!
//! Buffer storages never own entities. They talk to whatever owns entity
//! lifetimes through the [`EntityWorld`] trait, passed in on every call that
//! needs it. [`World`] is a fixed-capacity implementation of that trait.

use super::entity::EntityId;

/// Entity lifecycle operations a buffer storage depends on.
pub trait EntityWorld {
    /// Returns `true` if `entity` refers to a live entity.
    fn is_alive(&self, entity: EntityId) -> bool;

    /// Records that `entity` gained component `component`.
    fn mark_component_added(&mut self, entity: EntityId, component: u8);

    /// Records that `entity` lost component `component`.
    ///
    /// Returns how many components the entity still has.
    fn mark_component_removed(&mut self, entity: EntityId, component: u8) -> u32;

    /// Destroys `entity`. Called once its last component is gone.
    fn destroy_entity(&mut self, entity: EntityId);

    /// Notification that a component was attached or detached.
    fn on_component_changed(&mut self, _entity: EntityId, _component: u8, _added: bool) {}

    /// Notification that an entity's data changed.
    ///
    /// Only called when the `change-events` feature is enabled.
    fn raise_change_event(&mut self, _entity: EntityId) {}
}

/// A change notification recorded by [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A component was attached.
    Added {
        /// The entity.
        entity: EntityId,
        /// Component type ID.
        component: u8,
    },
    /// A component was detached.
    Removed {
        /// The entity.
        entity: EntityId,
        /// Component type ID.
        component: u8,
    },
    /// Entity data changed.
    Touched {
        /// The entity.
        entity: EntityId,
    },
}

/// Per-slot entity state.
#[derive(Clone, Copy, Debug)]
struct EntitySlot {
    /// Bumped on every despawn.
    generation: u32,
    /// Bitmask of attached components (up to 64 component types).
    component_mask: u64,
    alive: bool,
}

impl EntitySlot {
    const DEAD: Self = Self {
        generation: 0,
        component_mask: 0,
        alive: false,
    };
}

/// Fixed-capacity entity table.
///
/// Slots are preallocated at creation and recycled on despawn with a bumped
/// generation, so stale IDs are detected.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new(1024);
/// let entity = world.spawn();
/// assert!(world.is_alive(entity));
/// ```
pub struct World {
    slots: Box<[EntitySlot]>,
    /// Free slot indices, next to spawn on top.
    free_indices: Vec<u32>,
    alive_count: usize,
    changes: Vec<ChangeEvent>,
}

impl World {
    /// Creates a world with room for `capacity` live entities.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let Ok(top) = u32::try_from(capacity) else {
            panic!("Capacity cannot exceed u32::MAX");
        };

        Self {
            slots: vec![EntitySlot::DEAD; capacity].into_boxed_slice(),
            free_indices: (0..top).rev().collect(),
            alive_count: 0,
            changes: Vec::new(),
        }
    }

    /// Maximum number of live entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Spawns a new entity.
    ///
    /// Returns `EntityId::NULL` if the world is full.
    pub fn spawn(&mut self) -> EntityId {
        let Some(index) = self.free_indices.pop() else {
            return EntityId::NULL;
        };

        let slot = &mut self.slots[index as usize];
        slot.component_mask = 0;
        slot.alive = true;
        self.alive_count += 1;

        EntityId::new(index, slot.generation)
    }

    /// Despawns an entity, freeing its slot for reuse.
    ///
    /// Returns `false` if the entity was already dead or the ID is stale.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.live_slot_mut(id) else {
            return false;
        };

        slot.alive = false;
        slot.component_mask = 0;
        slot.generation = slot.generation.wrapping_add(1);
        self.alive_count -= 1;
        self.free_indices.push(id.index());

        true
    }

    /// Bitmask of the components attached to a live entity.
    #[must_use]
    pub fn component_mask(&self, id: EntityId) -> Option<u64> {
        self.live_slot(id).map(|slot| slot.component_mask)
    }

    /// Returns `true` if a live entity has component `component`.
    #[must_use]
    pub fn has_component(&self, id: EntityId, component: u8) -> bool {
        self.component_mask(id)
            .is_some_and(|mask| mask & component_bit(component) != 0)
    }

    /// Change notifications recorded so far.
    #[must_use]
    pub fn changes(&self) -> &[ChangeEvent] {
        &self.changes
    }

    /// Removes and returns all recorded change notifications.
    pub fn drain_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.changes)
    }

    fn live_slot(&self, id: EntityId) -> Option<&EntitySlot> {
        if id.is_null() {
            return None;
        }
        self.slots
            .get(id.key())
            .filter(|slot| slot.alive && slot.generation == id.generation())
    }

    fn live_slot_mut(&mut self, id: EntityId) -> Option<&mut EntitySlot> {
        if id.is_null() {
            return None;
        }
        self.slots
            .get_mut(id.key())
            .filter(|slot| slot.alive && slot.generation == id.generation())
    }
}

/// Mask bit for `component`; IDs past 63 have no bit.
#[inline]
fn component_bit(component: u8) -> u64 {
    1u64.checked_shl(u32::from(component)).unwrap_or(0)
}

impl EntityWorld for World {
    fn is_alive(&self, entity: EntityId) -> bool {
        self.live_slot(entity).is_some()
    }

    fn mark_component_added(&mut self, entity: EntityId, component: u8) {
        if let Some(slot) = self.live_slot_mut(entity) {
            slot.component_mask |= component_bit(component);
        }
    }

    fn mark_component_removed(&mut self, entity: EntityId, component: u8) -> u32 {
        match self.live_slot_mut(entity) {
            Some(slot) => {
                slot.component_mask &= !component_bit(component);
                slot.component_mask.count_ones()
            }
            None => 0,
        }
    }

    fn destroy_entity(&mut self, entity: EntityId) {
        self.despawn(entity);
    }

    fn on_component_changed(&mut self, entity: EntityId, component: u8, added: bool) {
        let event = if added {
            ChangeEvent::Added { entity, component }
        } else {
            ChangeEvent::Removed { entity, component }
        };
        self.changes.push(event);
    }

    fn raise_change_event(&mut self, entity: EntityId) {
        self.changes.push(ChangeEvent::Touched { entity });
    }
}
