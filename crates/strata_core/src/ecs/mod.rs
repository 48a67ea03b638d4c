//! # Entity Component System
//!
//! Buffer components and the entity-facing side of their storage.
//!
//! ## Design Philosophy
//!
//! - One storage per component type, one dense store per storage
//! - Entities are keyed by index, never by pointer
//! - The entity world is a trait passed in by the caller, not a dependency

// Pod/Zeroable derives expand to unsafe impls.
#[allow(unsafe_code)]
mod component;
mod entity;
mod sparse;
mod storage;
mod view;
mod world;

pub use component::{Component, Voxel, Waypoint};
pub use entity::EntityId;
pub use sparse::SparseIndex;
pub use storage::{BufferStorage, StorageStats};
pub use view::BufferView;
pub use world::{ChangeEvent, EntityWorld, World};
