//! Expanding-ring search over the presence index and bearing computation.

use std::f64::consts::FRAC_PI_2;

use crate::error::CompassResult;
use crate::store::PresenceAdapter;
use crate::world::ChunkColumn;

use super::message::DirectionResult;

/// Hard cap on how far the ring scan extends from the origin, in chunk
/// columns. A safety bound, not derived from world size.
pub const MAX_SEARCH_RINGS: i32 = 173;

/// Planar bearing from `origin` to `target`, in radians.
///
/// `atan2(-(dz), dx) - pi/2`, deliberately left unnormalized: a target one
/// column north maps to 0.0, one column east to -pi/2.
pub fn bearing(origin: ChunkColumn, target: ChunkColumn) -> f64 {
    let up = (target.z - origin.z) as f64;
    let side = (target.x - origin.x) as f64;
    (-up).atan2(side) - FRAC_PI_2
}

/// Find the nearest present column outward from `origin`.
///
/// Scans square ring perimeters in a fixed order: both vertical edges top to
/// bottom, then both horizontal edges with corners excluded. The first hit
/// wins, so ties within a ring fall to traversal order, not distance.
/// Exhausting the bound is a normal "not found" result, not an error.
pub fn nearest_marker(
    adapter: &mut dyn PresenceAdapter,
    origin: ChunkColumn,
) -> CompassResult<DirectionResult> {
    if adapter.has_presence(origin)? {
        return Ok(DirectionResult::co_located());
    }

    for r in 1..=MAX_SEARCH_RINGS {
        for z in origin.z - r..=origin.z + r {
            let west = ChunkColumn::new(origin.x - r, z);
            if adapter.has_presence(west)? {
                return Ok(DirectionResult::toward(bearing(origin, west)));
            }
            let east = ChunkColumn::new(origin.x + r, z);
            if adapter.has_presence(east)? {
                return Ok(DirectionResult::toward(bearing(origin, east)));
            }
        }
        for x in origin.x - r + 1..origin.x + r {
            let north = ChunkColumn::new(x, origin.z - r);
            if adapter.has_presence(north)? {
                return Ok(DirectionResult::toward(bearing(origin, north)));
            }
            let south = ChunkColumn::new(x, origin.z + r);
            if adapter.has_presence(south)? {
                return Ok(DirectionResult::toward(bearing(origin, south)));
            }
        }
    }

    Ok(DirectionResult::not_found())
}
