//! # Buffer Components
//!
//! A buffer component gives an entity a growable array of fixed-size
//! elements. The component type is the element type: a `BufferStorage<C>`
//! holds, for every entity, a run of `C` values.

use bytemuck::{Pod, Zeroable};

/// Marker trait for buffer element types.
///
/// Elements must be:
/// - `Pod`: plain old data, safe to copy bitwise and to reinterpret
/// - `Default`: used when a slot is read before being written
/// - `'static`: one storage exists per element type
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Damage {
///     amount: u32,
/// }
///
/// impl Component for Damage {
///     const ID: u8 = 7;
/// }
/// ```
pub trait Component: Pod + Default + Send + Sync + 'static {
    /// Unique identifier for this component type (0-63).
    ///
    /// Used as the bit index in the owning world's component mask.
    const ID: u8;

    /// Evaluated when a storage for the type is created; fails the build if
    /// `ID` does not fit a 64-bit component mask.
    #[doc(hidden)]
    const ID_FITS_MASK: () = assert!(Self::ID < 64, "component ID must be below 64");
}

/// One point of a path an entity follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Waypoint {
    /// X coordinate in world space.
    pub x: f32,
    /// Y coordinate in world space.
    pub y: f32,
    /// Z coordinate in world space.
    pub z: f32,
    /// Seconds to wait once the point is reached.
    pub dwell: f32,
}

impl Component for Waypoint {
    const ID: u8 = 0;
}

impl Waypoint {
    /// Creates a waypoint with no dwell time.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, dwell: 0.0 }
    }
}

/// Voxel edit recorded against a chunk entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Voxel {
    /// Material/block type ID.
    pub material_id: u16,
    /// Flags (solid, transparent, etc.).
    pub flags: u8,
    /// Light level (0-15).
    pub light_level: u8,
}

impl Component for Voxel {
    const ID: u8 = 1;
}

impl Voxel {
    /// Creates a voxel of the given material with no flags and no light.
    #[inline]
    #[must_use]
    pub const fn new(material_id: u16) -> Self {
        Self {
            material_id,
            flags: 0,
            light_level: 0,
        }
    }
}
