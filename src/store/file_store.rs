//! File-backed presence index, one file per world.
//!
//! On-disk layout: `CMPS` magic, format version, crc32 of the payload, then
//! a bincode-encoded column map. Writes go through a temp file and rename so
//! a crash never leaves a half-written index behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CompassError, CompassResult};
use crate::store::adapter::{apply_band, ColumnBands, PresenceAdapter, StoreProvider};
use crate::world::{ChunkColumn, WorldId};

const MAGIC: &[u8; 4] = b"CMPS";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 12;

/// Presence index for a single world, lazily loaded from disk.
///
/// Each column maps to the set of vertical bands holding a marker; the
/// column has presence while the set is non-empty. This is the vertical
/// aggregation the search layer relies on: queries never distinguish bands.
pub struct FilePresenceStore {
    world: WorldId,
    path: PathBuf,
    columns: Option<ColumnBands>,
    dirty: bool,
}

impl FilePresenceStore {
    /// Store for `world` rooted at `root`. No I/O happens until first use.
    pub fn new(world: WorldId, root: &Path) -> Self {
        Self {
            world,
            path: root.join(format!("compass_{}.dat", world)),
            columns: None,
            dirty: false,
        }
    }

    fn columns_mut(&mut self) -> CompassResult<&mut ColumnBands> {
        if self.columns.is_none() {
            let loaded = self.load()?;
            self.columns = Some(loaded);
        }
        Ok(self.columns.get_or_insert_with(ColumnBands::new))
    }

    fn load(&self) -> CompassResult<ColumnBands> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                // A world that was never indexed opens as an empty index.
                return Ok(ColumnBands::new());
            }
            Err(err) => return Err(err.into()),
        };

        if bytes.len() < HEADER_LEN || &bytes[0..4] != MAGIC {
            return Err(CompassError::CorruptedData(format!(
                "{} is not a compass index",
                self.path.display()
            )));
        }

        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != FORMAT_VERSION {
            return Err(CompassError::VersionMismatch {
                expected: FORMAT_VERSION,
                found: version,
            });
        }

        let stored_crc = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let payload = &bytes[HEADER_LEN..];
        if crc32fast::hash(payload) != stored_crc {
            return Err(CompassError::CorruptedData(format!(
                "checksum mismatch in {}",
                self.path.display()
            )));
        }

        Ok(bincode::deserialize(payload)?)
    }

    fn flush(&mut self) -> CompassResult<()> {
        let columns = match self.columns.as_ref() {
            Some(columns) => columns,
            None => return Ok(()),
        };

        let payload = bincode::serialize(columns)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend_from_slice(&payload);

        let tmp = self.path.with_extension("dat.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        Ok(())
    }
}

impl PresenceAdapter for FilePresenceStore {
    fn has_presence(&mut self, column: ChunkColumn) -> CompassResult<bool> {
        Ok(self.columns_mut()?.contains_key(&column))
    }

    fn set_presence(
        &mut self,
        column: ChunkColumn,
        band: i32,
        value: bool,
    ) -> CompassResult<()> {
        let columns = self.columns_mut()?;
        apply_band(columns, column, band, value);
        self.dirty = true;
        Ok(())
    }

    fn close(&mut self) -> CompassResult<()> {
        if self.dirty {
            self.flush()?;
            log::debug!(
                "[FilePresenceStore] flushed index for world {}",
                self.world
            );
        }
        self.columns = None;
        Ok(())
    }
}

/// Opens file-backed stores under a single root directory.
pub struct FileStoreProvider {
    root: PathBuf,
}

impl FileStoreProvider {
    /// Provider rooted at `root`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> CompassResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

impl StoreProvider for FileStoreProvider {
    fn open(&self, world: WorldId) -> CompassResult<Box<dyn PresenceAdapter>> {
        log::info!(
            "[FileStoreProvider] opening presence index for world {}",
            world
        );
        Ok(Box::new(FilePresenceStore::new(world, &self.root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(x: i32, z: i32) -> ChunkColumn {
        ChunkColumn::new(x, z)
    }

    #[test]
    fn missing_file_opens_as_empty_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FilePresenceStore::new(WorldId(1), dir.path());
        assert!(!store.has_presence(column(0, 0)).expect("query"));
    }

    #[test]
    fn set_then_query_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FilePresenceStore::new(WorldId(1), dir.path());
        store.set_presence(column(5, -7), 2, true).expect("set");
        assert!(store.has_presence(column(5, -7)).expect("query"));
        assert!(!store.has_presence(column(5, -6)).expect("query"));
    }

    #[test]
    fn index_survives_close_and_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FilePresenceStore::new(WorldId(7), dir.path());
        store.set_presence(column(1, 2), 0, true).expect("set");
        store.close().expect("close");

        // Same instance transparently reopens.
        assert!(store.has_presence(column(1, 2)).expect("query"));
        store.close().expect("close");

        // A fresh instance sees the same file.
        let mut reloaded = FilePresenceStore::new(WorldId(7), dir.path());
        assert!(reloaded.has_presence(column(1, 2)).expect("query"));
    }

    #[test]
    fn clearing_the_last_band_removes_the_column() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FilePresenceStore::new(WorldId(1), dir.path());
        store.set_presence(column(0, 0), 3, true).expect("set");
        store.set_presence(column(0, 0), 4, true).expect("set");
        store.set_presence(column(0, 0), 3, false).expect("clear");
        assert!(store.has_presence(column(0, 0)).expect("query"));
        store.set_presence(column(0, 0), 4, false).expect("clear");
        assert!(!store.has_presence(column(0, 0)).expect("query"));
    }

    #[test]
    fn bands_sixteen_apart_never_alias() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FilePresenceStore::new(WorldId(2), dir.path());
        store.set_presence(column(0, 0), 0, true).expect("set band 0");
        store.set_presence(column(0, 0), 16, true).expect("set band 16");
        store.set_presence(column(0, 0), 16, false).expect("clear band 16");
        assert!(store.has_presence(column(0, 0)).expect("query"));
        store.close().expect("close");

        // The distinction survives a round trip through the file.
        let mut reloaded = FilePresenceStore::new(WorldId(2), dir.path());
        assert!(reloaded.has_presence(column(0, 0)).expect("query"));
        reloaded.set_presence(column(0, 0), 0, false).expect("clear band 0");
        assert!(!reloaded.has_presence(column(0, 0)).expect("query"));
    }

    #[test]
    fn repeated_updates_are_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FilePresenceStore::new(WorldId(1), dir.path());
        store.set_presence(column(9, 9), 1, true).expect("set");
        store.set_presence(column(9, 9), 1, true).expect("set again");
        store.close().expect("close");

        let mut reloaded = FilePresenceStore::new(WorldId(1), dir.path());
        assert!(reloaded.has_presence(column(9, 9)).expect("query"));
        reloaded.set_presence(column(9, 9), 1, false).expect("clear");
        assert!(!reloaded.has_presence(column(9, 9)).expect("query"));
    }

    #[test]
    fn rejects_garbage_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(format!("compass_{}.dat", WorldId(3)));
        fs::write(&path, b"not an index at all").expect("write");

        let mut store = FilePresenceStore::new(WorldId(3), dir.path());
        match store.has_presence(column(0, 0)) {
            Err(CompassError::CorruptedData(_)) => {}
            other => panic!("expected CorruptedData, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn rejects_checksum_mismatch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FilePresenceStore::new(WorldId(4), dir.path());
        store.set_presence(column(0, 0), 0, true).expect("set");
        store.close().expect("close");

        let path = dir.path().join(format!("compass_{}.dat", WorldId(4)));
        let mut bytes = fs::read(&path).expect("read");
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&path, &bytes).expect("rewrite");

        let mut reloaded = FilePresenceStore::new(WorldId(4), dir.path());
        match reloaded.has_presence(column(0, 0)) {
            Err(CompassError::CorruptedData(_)) => {}
            other => panic!("expected CorruptedData, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn rejects_unknown_format_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(format!("compass_{}.dat", WorldId(5)));
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&99u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        fs::write(&path, &bytes).expect("write");

        let mut store = FilePresenceStore::new(WorldId(5), dir.path());
        match store.has_presence(column(0, 0)) {
            Err(CompassError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, FORMAT_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected VersionMismatch, got {:?}", other.map(|_| ())),
        }
    }
}
