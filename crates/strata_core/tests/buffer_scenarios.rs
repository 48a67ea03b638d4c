//! # Buffer Storage Scenarios
//!
//! End-to-end checks of attach, grow, detach and store growth against a
//! 4-byte element type, an initial store of 16 slots, 8 sparse slots and
//! room for 4 free regions.
//!
//! Run with: cargo test -p strata_core --test buffer_scenarios

use strata_core::{
    BufferConfig, BufferError, BufferStorage, ChangeEvent, EntityId, EntityWorld, SlabDescriptor,
    ValidationMode, Voxel, World,
};

fn config() -> BufferConfig {
    BufferConfig {
        initial_capacity: 16,
        sparse_capacity: 8,
        recycled_capacity: 4,
        default_buffer_size: 8,
        validation: ValidationMode::Checked,
    }
}

fn setup() -> (World, BufferStorage<Voxel>) {
    (World::new(64), BufferStorage::new(config()).unwrap())
}

fn materials(storage: &BufferStorage<Voxel>, entity: EntityId) -> Vec<u16> {
    storage
        .buffer(entity)
        .unwrap_or_default()
        .iter()
        .map(|v| v.material_id)
        .collect()
}

#[test]
fn construct_has_single_free_region() {
    let (_, storage) = setup();

    assert_eq!(std::mem::size_of::<Voxel>(), 4);
    assert_eq!(storage.free_list().as_slice(), &[SlabDescriptor::free(0, 16)]);
    assert!(storage.audit().is_ok());
}

#[test]
fn add_carves_requested_slab() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();

    storage.add(&mut world, entity, 4).unwrap();

    assert_eq!(
        storage.slab(entity),
        Some(SlabDescriptor {
            capacity: 4,
            length: 0,
            start: 0,
        })
    );
    assert_eq!(storage.free_list().as_slice(), &[SlabDescriptor::free(4, 12)]);
}

#[test]
fn fifth_push_doubles_and_preserves_order() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();

    let mut view = storage.add(&mut world, entity, 4).unwrap();
    for material in 10..15 {
        view.push(Voxel::new(material));
    }

    let slab = storage.slab(entity).unwrap();
    assert_eq!(slab.capacity, 8);
    assert_eq!(slab.length, 5);
    assert_eq!(materials(&storage, entity), vec![10, 11, 12, 13, 14]);

    // The old [0, 4) merged with [4, 16) before the new slab was taken.
    assert_eq!(storage.free_list().as_slice(), &[SlabDescriptor::free(8, 8)]);
    assert_eq!(storage.store_capacity(), 16);
    assert!(storage.audit().is_ok());
}

#[test]
fn del_restores_full_region_and_reuses_it() {
    let (mut world, mut storage) = setup();
    let first = world.spawn();

    let mut view = storage.add(&mut world, first, 4).unwrap();
    for material in 0..5 {
        view.push(Voxel::new(material));
    }
    assert!(storage.del(&mut world, first));

    assert!(!storage.has(first));
    assert_eq!(storage.free_list().as_slice(), &[SlabDescriptor::free(0, 16)]);

    let second = world.spawn();
    storage.add(&mut world, second, 16).unwrap();
    assert_eq!(storage.store_capacity(), 16);
    assert_eq!(storage.slab(second).map(|s| s.start), Some(0));
    assert!(storage.free_list().is_empty());
}

#[test]
fn add_on_empty_free_list_grows_store() {
    let (mut world, mut storage) = setup();
    let filler = world.spawn();
    let entity = world.spawn();

    storage.add(&mut world, filler, 16).unwrap();
    assert!(storage.free_list().is_empty());

    storage.add(&mut world, entity, 20).unwrap();

    // 16 -> 32 leaves a 16-slot tail, too small; 32 -> 64 extends it.
    assert_eq!(storage.store_capacity(), 64);
    assert_eq!(
        storage.slab(entity),
        Some(SlabDescriptor {
            capacity: 20,
            length: 0,
            start: 16,
        })
    );
    assert_eq!(storage.free_list().as_slice(), &[SlabDescriptor::free(36, 28)]);
    assert!(storage.audit().is_ok());
}

#[test]
fn oversized_request_terminates() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();

    storage.add(&mut world, entity, 5000).unwrap();

    assert_eq!(storage.store_capacity(), 8192);
    assert!(storage.audit().is_ok());
}

#[test]
fn interleaved_buffers_keep_their_data() {
    let (mut world, mut storage) = setup();
    let entities: Vec<EntityId> = (0..6).map(|_| world.spawn()).collect();

    for &entity in &entities {
        storage.add(&mut world, entity, 1).unwrap();
    }
    for round in 0..12u16 {
        for (i, &entity) in entities.iter().enumerate() {
            let mut view = storage.get(&world, entity).unwrap();
            view.push(Voxel::new(round * 100 + i as u16));
        }
        assert!(storage.audit().is_ok());
    }

    for (i, &entity) in entities.iter().enumerate() {
        let expected: Vec<u16> = (0..12).map(|round| round * 100 + i as u16).collect();
        assert_eq!(materials(&storage, entity), expected);
    }

    let stats = storage.stats();
    assert_eq!(stats.buffers, 6);
    assert_eq!(stats.live, 72);
    assert_eq!(stats.allocated + stats.free, stats.store_capacity);
}

#[test]
fn has_is_false_after_del() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();
    world.mark_component_added(entity, 9);

    storage.add_default(&mut world, entity).unwrap();
    assert!(storage.has(entity));
    assert_eq!(storage.slab(entity).map(|s| s.capacity), Some(8));

    storage.del(&mut world, entity);
    assert!(!storage.has(entity));
    assert!(matches!(
        storage.get(&world, entity),
        Err(BufferError::MissingComponent { .. })
    ));
}

#[test]
fn del_of_last_component_destroys_entity() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();

    storage.add(&mut world, entity, 2).unwrap();
    storage.del(&mut world, entity);

    assert!(!world.is_alive(entity));
    assert!(world
        .changes()
        .iter()
        .any(|c| *c == ChangeEvent::Removed { entity, component: 1 }));
}

#[test]
fn respawned_entity_starts_without_buffer() {
    let mut world = World::new(1);
    let mut storage: BufferStorage<Voxel> = BufferStorage::new(config()).unwrap();

    let old = world.spawn();
    storage
        .add_from_slice(&mut world, old, &[Voxel::new(42)])
        .unwrap();
    world.despawn(old);
    let fresh = world.spawn();
    assert_eq!(fresh.key(), old.key());

    assert!(!storage.has(fresh));
    assert!(matches!(
        storage.get(&world, fresh),
        Err(BufferError::MissingComponent { .. })
    ));

    let mut view = storage.add(&mut world, fresh, 1).unwrap();
    view.push(Voxel::new(7));
    assert_eq!(materials(&storage, fresh), vec![7]);
    assert_eq!(storage.len(), 1);
    assert_eq!(storage.free_list().as_slice(), &[SlabDescriptor::free(2, 14)]);

    assert!(!storage.del(&mut world, old));
    assert!(storage.del(&mut world, fresh));
    assert!(!world.is_alive(fresh));
    assert!(storage.audit().is_ok());
}

#[test]
fn sparse_index_grows_for_large_keys() {
    let (mut world, mut storage) = setup();
    let entities: Vec<EntityId> = (0..40).map(|_| world.spawn()).collect();

    for &entity in entities.iter().rev() {
        storage.add(&mut world, entity, 1).unwrap();
    }

    assert_eq!(storage.len(), 40);
    assert_eq!(storage.slabs().count(), 40);
    assert!(storage.audit().is_ok());
}

#[test]
fn remove_range_clamps_at_length() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();

    let mut view = storage
        .add_from_slice(&mut world, entity, &[Voxel::new(1), Voxel::new(2), Voxel::new(3)])
        .unwrap();
    view.remove_range(2, 10);
    assert_eq!(view.len(), 2);
    view.remove_range(0, usize::MAX);
    assert_eq!(view.len(), 0);
}

#[test]
fn reinterpret_requires_equal_size() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();

    let view = storage.add(&mut world, entity, 2).unwrap();
    assert!(matches!(
        view.reinterpret::<u64>(),
        Err(BufferError::IncompatibleReinterpret { from: 4, to: 8 })
    ));

    let view = storage.get(&world, entity).unwrap();
    let mut words = view.reinterpret::<[u8; 4]>().unwrap();
    words.push([1, 0, 0, 0]);
    assert_eq!(materials(&storage, entity), vec![1]);
}

#[cfg(feature = "change-events")]
#[test]
fn change_events_are_raised() {
    let (mut world, mut storage) = setup();
    let entity = world.spawn();

    storage.add(&mut world, entity, 2).unwrap();
    assert!(world.changes().contains(&ChangeEvent::Touched { entity }));
}
