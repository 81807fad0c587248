//! Region scan feeding the presence index.
//!
//! Runs synchronously on whatever thread calls it and may be expensive (up
//! to 16 * 16 * 32 lookups); it is never performed on the worker thread.

use crate::world::{vertical_band, ChunkColumn, MarkerSpec, VoxelQuery};

/// Outcome of scanning one aligned volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeScan {
    pub column: ChunkColumn,
    pub band: i32,
    pub present: bool,
}

/// Scan the aligned volume containing `(x, y, z)` for the marker block.
///
/// The volume spans one chunk column horizontally and one 32-block vertical
/// band, starting at the aligned low corner. Short-circuits on the first
/// match; uniqueness and match counts are not verified.
pub fn scan_volume<W: VoxelQuery + ?Sized>(
    voxels: &W,
    marker: MarkerSpec,
    x: i32,
    y: i32,
    z: i32,
) -> VolumeScan {
    let column = ChunkColumn::containing(x, z);
    let band = vertical_band(y);

    let low_x = column.x << 4;
    let low_z = column.z << 4;
    let low_y = band << 5;

    for bx in low_x..low_x + 16 {
        for bz in low_z..low_z + 16 {
            for by in low_y..low_y + 32 {
                if voxels.block_at(bx, by, bz) == marker.block
                    && voxels.sub_state_at(bx, by, bz) == marker.sub_state
                {
                    return VolumeScan {
                        column,
                        band,
                        present: true,
                    };
                }
            }
        }
    }

    VolumeScan {
        column,
        band,
        present: false,
    }
}
