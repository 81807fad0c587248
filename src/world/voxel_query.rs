//! Read-only voxel lookups consumed by the region scanner.

use super::BlockId;

/// Block lookup interface provided by the embedding world.
///
/// The compass service only reads through this trait, and only on the
/// caller's thread; the worker never touches the voxel world.
pub trait VoxelQuery {
    /// Block type at the given world coordinates.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId;

    /// Block sub-state at the given world coordinates.
    fn sub_state_at(&self, x: i32, y: i32, z: i32) -> u16;
}
