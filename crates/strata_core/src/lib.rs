//! # STRATA Core
//!
//! Variable-length buffer components for an entity component system.
//!
//! Each entity may own a growable array per buffer component type. All
//! arrays of one type are packed into a single dense store:
//! - 1 allocation per component type, not per entity
//! - Free regions are coalesced so fragmentation stays bounded
//! - Full buffers relocate to a slab twice their size
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::{BufferStorage, Voxel, World};
//!
//! let mut world = World::new(1024);
//! let mut edits: BufferStorage<Voxel> = BufferStorage::with_defaults();
//!
//! let chunk = world.spawn();
//! let mut view = edits.add(&mut world, chunk, 4)?;
//! view.push(Voxel::new(3));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;

pub use config::{BufferConfig, ValidationMode};
pub use ecs::{
    BufferStorage, BufferView, ChangeEvent, Component, EntityId, EntityWorld, SparseIndex,
    StorageStats, Voxel, Waypoint, World,
};
pub use error::{BufferError, BufferResult};
pub use memory::{DenseStore, FreeList, SlabDescriptor};
