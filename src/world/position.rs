//! World identity and coordinate derivations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a world instance.
///
/// Distinct worlds never share a presence index. The id keys the worker's
/// per-world store cache and names the on-disk index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u64);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal 16x16-block grid cell identified by (x, z) chunk coordinates.
///
/// The unit of horizontal search granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkColumn {
    pub x: i32,
    pub z: i32,
}

impl ChunkColumn {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column containing the given block coordinates.
    ///
    /// Arithmetic shift truncation (floor division), never rounding.
    pub fn containing(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x >> 4,
            z: block_z >> 4,
        }
    }

    /// Create a new column offset by the given amounts.
    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }
}

/// 32-block vertical slab ("double chunk") containing the given block Y.
pub fn vertical_band(block_y: i32) -> i32 {
    block_y >> 5
}
