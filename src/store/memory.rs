//! In-memory presence store, for tests and headless embedding.

use crate::error::CompassResult;
use crate::store::adapter::{apply_band, ColumnBands, PresenceAdapter};
use crate::world::ChunkColumn;

/// Presence index with no backing file. `close` is a no-op.
#[derive(Debug, Default)]
pub struct MemoryPresenceStore {
    columns: ColumnBands,
}

impl MemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns currently marked present.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl PresenceAdapter for MemoryPresenceStore {
    fn has_presence(&mut self, column: ChunkColumn) -> CompassResult<bool> {
        Ok(self.columns.contains_key(&column))
    }

    fn set_presence(
        &mut self,
        column: ChunkColumn,
        band: i32,
        value: bool,
    ) -> CompassResult<()> {
        apply_band(&mut self.columns, column, band, value);
        Ok(())
    }

    fn close(&mut self) -> CompassResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_is_band_agnostic() {
        let mut store = MemoryPresenceStore::new();
        store
            .set_presence(ChunkColumn::new(2, 3), 7, true)
            .expect("set");
        assert!(store.has_presence(ChunkColumn::new(2, 3)).expect("query"));
        store
            .set_presence(ChunkColumn::new(2, 3), 7, false)
            .expect("clear");
        assert!(store.is_empty());
    }

    #[test]
    fn tracks_columns_independently() {
        let mut store = MemoryPresenceStore::new();
        store
            .set_presence(ChunkColumn::new(2, 3), 7, true)
            .expect("set");
        store
            .set_presence(ChunkColumn::new(4, 5), 0, true)
            .expect("set");
        assert_eq!(store.len(), 2);

        store
            .set_presence(ChunkColumn::new(2, 3), 7, false)
            .expect("clear");
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn negative_bands_are_distinct() {
        let mut store = MemoryPresenceStore::new();
        let column = ChunkColumn::new(0, 0);
        store.set_presence(column, -1, true).expect("set band -1");
        store.set_presence(column, 15, true).expect("set band 15");
        store.set_presence(column, 15, false).expect("clear band 15");
        assert!(store.has_presence(column).expect("query"));
    }
}
