//! Marker compass service.
//!
//! Resolves the compass bearing from a position in a large sparse voxel
//! world to the nearest known marker structure, and keeps a persisted
//! per-world presence index current as the world is explored. A single
//! background worker serializes all index access behind a FIFO job queue;
//! callers post presence updates and bearing requests and receive results
//! through callbacks.

pub mod compass;
pub mod error;
pub mod store;
pub mod world;

pub use compass::{
    scan_volume, CompassConfig, CompassMessage, CompassService, DirectionCallback,
    DirectionResult, VolumeScan, MAX_SEARCH_RINGS,
};
pub use error::{CompassError, CompassResult};
pub use store::{
    FilePresenceStore, FileStoreProvider, MemoryPresenceStore, PresenceAdapter, StoreProvider,
};
pub use world::{vertical_band, BlockId, ChunkColumn, MarkerSpec, VoxelQuery, WorldId};
