//! The compass service: worker lifecycle, dispatch and the per-world store
//! cache.
//!
//! Exactly one worker thread executes all adapter access, index mutation and
//! search logic; it is the sole serialization point. Callers only scan
//! voxels and post messages.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::error::CompassResult;
use crate::store::{FileStoreProvider, PresenceAdapter, StoreProvider};
use crate::world::{ChunkColumn, MarkerSpec, VoxelQuery, WorldId};

use super::message::{CompassMessage, DirectionCallback};
use super::queue::JobQueue;
use super::scanner::scan_volume;
use super::spiral::nearest_marker;

/// Configuration for the compass service.
#[derive(Debug, Clone)]
pub struct CompassConfig {
    /// Root directory for per-world presence index files.
    pub storage_dir: PathBuf,
    /// Block type and sub-state recognized as a marker.
    pub marker: MarkerSpec,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("saves/compass"),
            marker: MarkerSpec::default(),
        }
    }
}

/// Single-worker service resolving bearings to the nearest marker.
///
/// The per-world adapter cache lives on the worker thread and is never
/// evicted, which assumes a small, bounded number of worlds per process.
/// Callbacks fire at most once; requests abandoned at shutdown or dropped
/// after a store failure never see their callback invoked.
pub struct CompassService {
    queue: Arc<JobQueue>,
    marker: MarkerSpec,
    provider: Arc<dyn StoreProvider>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CompassService {
    /// Create a service backed by file stores under the configured root.
    pub fn new(config: CompassConfig) -> CompassResult<Self> {
        let provider = FileStoreProvider::new(&config.storage_dir)?;
        Ok(Self::with_provider(Arc::new(provider), config.marker))
    }

    /// Create a service over a custom store provider.
    pub fn with_provider(provider: Arc<dyn StoreProvider>, marker: MarkerSpec) -> Self {
        Self {
            queue: Arc::new(JobQueue::new()),
            marker,
            provider,
            worker: None,
        }
    }

    /// Spawn the worker thread. A second call while running is a no-op.
    pub fn start(&mut self) -> CompassResult<()> {
        if self.worker.is_some() {
            log::warn!("[CompassService] start() called while already running");
            return Ok(());
        }

        // A stopped service restarts with a fresh queue; anything abandoned
        // by the previous shutdown stays abandoned.
        if self.queue.is_shut_down() {
            self.queue = Arc::new(JobQueue::new());
        }

        let queue = Arc::clone(&self.queue);
        let provider = Arc::clone(&self.provider);
        let handle = thread::Builder::new()
            .name("compass-worker".to_string())
            .spawn(move || worker_loop(queue, provider))?;
        self.worker = Some(handle);
        log::info!("[CompassService] worker started");
        Ok(())
    }

    /// Request shutdown and wait for the worker to exit.
    ///
    /// Does not return until the worker has fully exited and will process no
    /// further messages. Messages still queued when the worker observes the
    /// flag are dropped; their callbacks are never invoked.
    pub fn stop(&mut self) {
        self.queue.request_shutdown();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("[CompassService] worker thread panicked");
            }
            log::info!("[CompassService] worker stopped");
        }
    }

    /// Scan the aligned volume around `(x, y, z)` on the calling thread and
    /// queue the resulting presence update.
    ///
    /// The scan itself may be expensive (up to 8192 voxel lookups); the
    /// enqueue afterwards never blocks.
    pub fn post_area_update<W: VoxelQuery + ?Sized>(
        &self,
        world: WorldId,
        voxels: &W,
        x: i32,
        y: i32,
        z: i32,
    ) {
        let scan = scan_volume(voxels, self.marker, x, y, z);
        self.queue.post(CompassMessage::UpdatePost {
            world,
            column: scan.column,
            band: scan.band,
            present: scan.present,
        });
    }

    /// Queue a bearing request. `callback` fires at most once, on the
    /// worker thread; callers must not wait on it without their own timeout.
    ///
    /// The vertical coordinate is accepted for interface symmetry; the
    /// search itself is planar.
    pub fn request_direction(
        &self,
        world: WorldId,
        x: i32,
        _y: i32,
        z: i32,
        callback: DirectionCallback,
    ) {
        self.queue.post(CompassMessage::DirectionRequest {
            world,
            block_x: x,
            block_z: z,
            callback,
        });
    }
}

impl Drop for CompassService {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop();
        }
    }
}

fn worker_loop(queue: Arc<JobQueue>, provider: Arc<dyn StoreProvider>) {
    // Lazily populated, never evicted; only this thread ever touches it.
    let mut stores: HashMap<WorldId, Box<dyn PresenceAdapter>> = HashMap::new();

    while let Some(message) = queue.take_blocking() {
        let kind = message.kind();
        if let Err(err) = dispatch(message, &provider, &mut stores) {
            log::error!(
                "[CompassService] dropping {} message after store failure: {}",
                kind,
                err
            );
        }
    }
}

fn dispatch(
    message: CompassMessage,
    provider: &Arc<dyn StoreProvider>,
    stores: &mut HashMap<WorldId, Box<dyn PresenceAdapter>>,
) -> CompassResult<()> {
    match message {
        CompassMessage::UpdatePost {
            world,
            column,
            band,
            present,
        } => {
            let store = cached_store(stores, provider, world)?;
            store.set_presence(column, band, present)?;
            store.close()?;
            log::debug!(
                "[CompassService] world {} column {:?} band {} present={}",
                world,
                column,
                band,
                present
            );
        }
        CompassMessage::DirectionRequest {
            world,
            block_x,
            block_z,
            callback,
        } => {
            let origin = ChunkColumn::containing(block_x, block_z);
            let store = cached_store(stores, provider, world)?;
            let result = match nearest_marker(store.as_mut(), origin) {
                Ok(result) => result,
                Err(err) => {
                    // Release the store even on the failure path; the
                    // callback is dropped without being invoked.
                    let _ = store.close();
                    return Err(err);
                }
            };
            store.close()?;
            callback(result);
        }
    }
    Ok(())
}

fn cached_store<'a>(
    stores: &'a mut HashMap<WorldId, Box<dyn PresenceAdapter>>,
    provider: &Arc<dyn StoreProvider>,
    world: WorldId,
) -> CompassResult<&'a mut Box<dyn PresenceAdapter>> {
    match stores.entry(world) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => Ok(entry.insert(provider.open(world)?)),
    }
}
