//! # Buffer Storage Benchmark
//!
//! Measures attach, push-driven growth and detach/reattach churn.
//!
//! Run with: `cargo bench --package strata_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use strata_core::{BufferConfig, BufferStorage, EntityId, ValidationMode, Voxel, World};

const ENTITY_COUNT: usize = 10_000;

fn config() -> BufferConfig {
    BufferConfig::large().with_validation(ValidationMode::Unchecked)
}

fn spawn_all(world: &mut World, count: usize) -> Vec<EntityId> {
    (0..count).map(|_| world.spawn()).collect()
}

/// Benchmark: attach one fixed-size buffer per entity.
fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_buffers");

    for size in [1, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut world = World::new(ENTITY_COUNT);
                let entities = spawn_all(&mut world, ENTITY_COUNT);
                let mut storage = BufferStorage::<Voxel>::new(config()).unwrap();
                for &entity in &entities {
                    black_box(storage.add(&mut world, entity, size).map(|v| v.capacity()).ok());
                }
                storage.store_capacity()
            });
        });
    }

    group.finish();
}

/// Benchmark: push into capacity-1 buffers so every power of two relocates.
fn bench_push_growth(c: &mut Criterion) {
    c.bench_function("push_growth_1k_x_64", |b| {
        b.iter(|| {
            let mut world = World::new(1_000);
            let entities = spawn_all(&mut world, 1_000);
            let mut storage = BufferStorage::<Voxel>::new(config()).unwrap();
            for &entity in &entities {
                storage.add(&mut world, entity, 1).ok();
            }
            for round in 0..64u16 {
                for &entity in &entities {
                    if let Ok(mut view) = storage.get(&world, entity) {
                        view.push(Voxel::new(round));
                    }
                }
            }
            black_box(storage.stats())
        });
    });
}

/// Benchmark: detach and reattach half the buffers, stressing coalescing.
fn bench_del_churn(c: &mut Criterion) {
    let mut world = World::new(ENTITY_COUNT);
    let entities = spawn_all(&mut world, ENTITY_COUNT);
    let mut storage = BufferStorage::<Voxel>::new(config()).unwrap();
    for &entity in &entities {
        // Keep entities alive across detach.
        strata_core::EntityWorld::mark_component_added(&mut world, entity, 63);
        storage.add(&mut world, entity, 16).ok();
    }

    c.bench_function("del_reattach_churn_10k", |b| {
        b.iter(|| {
            for &entity in entities.iter().step_by(2) {
                storage.del(&mut world, entity);
            }
            for &entity in entities.iter().step_by(2) {
                storage.add(&mut world, entity, 16).ok();
            }
            black_box(storage.free_list().len())
        });
    });
}

criterion_group!(benches, bench_add, bench_push_growth, bench_del_churn);
criterion_main!(benches);
