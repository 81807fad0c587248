//! World-facing types: identities, coordinates and the voxel interface.

pub mod block;
pub mod position;
pub mod voxel_query;

pub use block::{BlockId, MarkerSpec};
pub use position::{vertical_band, ChunkColumn, WorldId};
pub use voxel_query::VoxelQuery;
