//! Compass core: job queue, region scan, spiral search and the worker
//! service tying them together.

pub mod message;
pub mod queue;
pub mod scanner;
pub mod service;
pub mod spiral;

pub use message::{CompassMessage, DirectionCallback, DirectionResult};
pub use queue::JobQueue;
pub use scanner::{scan_volume, VolumeScan};
pub use service::{CompassConfig, CompassService};
pub use spiral::{bearing, nearest_marker, MAX_SEARCH_RINGS};
