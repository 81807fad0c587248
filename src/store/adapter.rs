//! Presence store interfaces consumed by the worker.

use std::collections::{BTreeSet, HashMap};

use crate::error::CompassResult;
use crate::world::{ChunkColumn, WorldId};

/// Per-world keyed boolean presence at chunk-column granularity.
///
/// Only the worker thread ever touches an adapter, one operation at a time;
/// `&mut self` encodes that single-owner rule. `close` flushes and releases
/// resources, and any later call transparently reopens, so a cached adapter
/// stays valid across close cycles.
pub trait PresenceAdapter: Send {
    /// Whether any marker is recorded for the column, in any vertical band.
    fn has_presence(&mut self, column: ChunkColumn) -> CompassResult<bool>;

    /// Record or clear marker presence for one vertical band of a column.
    fn set_presence(&mut self, column: ChunkColumn, band: i32, value: bool)
        -> CompassResult<()>;

    /// Flush pending changes and release resources.
    fn close(&mut self) -> CompassResult<()>;
}

/// Hands the worker an adapter for a world it has not seen before.
///
/// The worker opens each world's adapter once and caches it for the life of
/// the process; providers are not asked twice for the same world.
pub trait StoreProvider: Send + Sync {
    fn open(&self, world: WorldId) -> CompassResult<Box<dyn PresenceAdapter>>;
}

/// Bands with recorded presence, keyed by column.
///
/// A column has presence while its band set is non-empty. Bands are stored
/// verbatim, so any two distinct `i32` bands are independent.
pub(crate) type ColumnBands = HashMap<ChunkColumn, BTreeSet<i32>>;

/// Apply one band update, dropping the column once its last band clears.
pub(crate) fn apply_band(columns: &mut ColumnBands, column: ChunkColumn, band: i32, value: bool) {
    if value {
        columns.entry(column).or_default().insert(band);
    } else if let Some(bands) = columns.get_mut(&column) {
        bands.remove(&band);
        if bands.is_empty() {
            columns.remove(&column);
        }
    }
}
