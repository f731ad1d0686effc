//! Chunk file storage
//!
//! One file per chunk coordinate holding exactly the raw block array.
//! An absent or corrupt file is not an error: the caller regenerates the
//! chunk deterministically from the seed instead.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::types::Result;
use crate::world::chunk::{CHUNK_VOLUME, Chunk, ChunkCoord};

/// Chunk persistence rooted at `<world>/chunks`
pub struct ChunkStore {
    dir: PathBuf,
}

impl ChunkStore {
    /// Create a store for the given world directory. The chunks
    /// subdirectory is created on first save.
    pub fn new(world_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: world_dir.as_ref().join("chunks"),
        }
    }

    /// Get the file path for a chunk
    pub fn path_for(&self, coord: ChunkCoord) -> PathBuf {
        self.dir.join(coord.file_name())
    }

    /// Save a chunk's raw block payload
    pub fn save(&self, chunk: &Chunk) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(chunk.coord), chunk.blocks())?;
        Ok(())
    }

    /// Load a chunk if a valid file exists.
    ///
    /// Returns `Ok(None)` for absent or wrong-sized files so the caller
    /// falls back to regeneration rather than propagating corruption.
    pub fn load(&self, coord: ChunkCoord) -> Result<Option<Chunk>> {
        let path = self.path_for(coord);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path)?;
        if data.len() != CHUNK_VOLUME {
            log::warn!(
                "chunk file {} has {} bytes, expected {}; regenerating",
                path.display(),
                data.len(),
                CHUNK_VOLUME
            );
            return Ok(None);
        }
        Ok(Some(Chunk::from_blocks(coord, &data)))
    }

    /// Delete a chunk file if it exists
    pub fn delete(&self, coord: ChunkCoord) -> Result<()> {
        let path = self.path_for(coord);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Check if a chunk file exists on disk
    pub fn exists(&self, coord: ChunkCoord) -> bool {
        self.path_for(coord).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::block::BlockId;
    use tempfile::TempDir;

    #[test]
    fn test_path_for() {
        let store = ChunkStore::new("/tmp/world");
        assert_eq!(
            store.path_for(ChunkCoord::new(5, 10, -3)),
            PathBuf::from("/tmp/world/chunks/chunk_5_10_-3.bin")
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());

        let coord = ChunkCoord::new(1, 2, 3);
        let mut chunk = Chunk::new(coord);
        chunk.set(4, 5, 6, BlockId::IRON_ORE);

        store.save(&chunk).unwrap();
        assert!(store.exists(coord));

        let loaded = store.load(coord).unwrap().unwrap();
        assert_eq!(loaded.coord, coord);
        assert_eq!(loaded.blocks()[..], chunk.blocks()[..]);
    }

    #[test]
    fn test_load_absent_is_none() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());
        assert!(store.load(ChunkCoord::new(9, 9, 9)).unwrap().is_none());
    }

    #[test]
    fn test_load_truncated_is_none() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());
        let coord = ChunkCoord::new(0, 0, 0);

        fs::create_dir_all(dir.path().join("chunks")).unwrap();
        fs::write(store.path_for(coord), [1u8; 100]).unwrap();

        assert!(store.load(coord).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());
        let coord = ChunkCoord::new(0, 1, 0);

        store.save(&Chunk::new(coord)).unwrap();
        assert!(store.exists(coord));

        store.delete(coord).unwrap();
        assert!(!store.exists(coord));
        // A second delete is a no-op, not an error
        store.delete(coord).unwrap();
    }
}
