//! # Memory Management
//!
//! Region bookkeeping for buffer components.
//!
//! ## Design Philosophy
//!
//! Every buffer of a component type lives in one dense store:
//! - Regions are addressed by offset, never by pointer
//! - Unused regions are tracked in a sorted, coalesced free list
//! - The store grows by doubling and never shrinks

mod dense;
mod free_list;
mod slab;

pub use dense::DenseStore;
pub use free_list::FreeList;
pub use slab::SlabDescriptor;
