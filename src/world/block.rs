//! Block identity and the marker-block specification.

use serde::{Deserialize, Serialize};

/// Unique identifier for a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const STONE: BlockId = BlockId(1);
    /// Default landmark block the compass points at.
    pub const SKY_STONE: BlockId = BlockId(2);
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::AIR
    }
}

/// The block type / sub-state pair treated as a locatable landmark.
///
/// Only an exact match on both fields counts; a marker block in any other
/// sub-state is ignored by the region scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpec {
    pub block: BlockId,
    pub sub_state: u16,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            block: BlockId::SKY_STONE,
            sub_state: 0,
        }
    }
}
