//! Messages exchanged between producers and the compass worker.

use crate::world::{ChunkColumn, WorldId};

/// Result delivered to a direction callback.
///
/// When `sentinel` is set the bearing is not meaningful: either the caller
/// is co-located with a marker, or nothing was found within the search
/// bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionResult {
    pub found: bool,
    pub sentinel: bool,
    pub bearing_radians: f64,
}

impl DirectionResult {
    /// The caller stands in a column that already holds a marker.
    pub fn co_located() -> Self {
        Self {
            found: true,
            sentinel: true,
            bearing_radians: 0.0,
        }
    }

    /// No marker within the search bound.
    pub fn not_found() -> Self {
        Self {
            found: false,
            sentinel: true,
            bearing_radians: 0.0,
        }
    }

    /// Nearest marker found at the given bearing.
    pub fn toward(bearing_radians: f64) -> Self {
        Self {
            found: true,
            sentinel: false,
            bearing_radians,
        }
    }
}

/// Invoked at most once, on the worker thread, with the request's outcome.
///
/// Never invoked if the request is abandoned at shutdown or its dispatch
/// fails in the store layer.
pub type DirectionCallback = Box<dyn FnOnce(DirectionResult) + Send>;

/// Job posted to the worker queue.
///
/// A closed sum type dispatched by a single match in the worker.
pub enum CompassMessage {
    /// Result of a region scan: record or clear presence for one column band.
    UpdatePost {
        world: WorldId,
        column: ChunkColumn,
        band: i32,
        present: bool,
    },
    /// Ask for the bearing from a block position to the nearest marker.
    DirectionRequest {
        world: WorldId,
        block_x: i32,
        block_z: i32,
        callback: DirectionCallback,
    },
}

impl CompassMessage {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            CompassMessage::UpdatePost { .. } => "update",
            CompassMessage::DirectionRequest { .. } => "direction-request",
        }
    }
}
