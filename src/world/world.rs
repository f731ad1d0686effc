//! World container: lazy chunk map with world-coordinate block access

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::world::block::BlockId;
use crate::world::chunk::{CHUNK_SIZE, Chunk, ChunkCoord, to_local};

/// Game mode the world was created with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Sandbox,
    Survival,
}

/// World dimensions in blocks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

/// World metadata persisted as `world.json`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldMeta {
    pub name: String,
    pub mode: GameMode,
    pub size: WorldSize,
    pub seed: i32,
}

impl WorldMeta {
    pub fn new(name: impl Into<String>, mode: GameMode, size: WorldSize, seed: i32) -> Self {
        Self {
            name: name.into(),
            mode,
            size,
            seed,
        }
    }
}

/// Container for the chunk map plus world-coordinate block accessors.
///
/// Chunks are created lazily and empty on first write access; reads of
/// missing chunks or out-of-range coordinates return air rather than
/// erroring.
pub struct World {
    meta: WorldMeta,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl World {
    /// Create a new empty world
    pub fn new(meta: WorldMeta) -> Self {
        Self {
            meta,
            chunks: HashMap::new(),
        }
    }

    pub fn meta(&self) -> &WorldMeta {
        &self.meta
    }

    /// Highest chunk-grid y the world height reaches
    pub fn max_chunk_y(&self) -> i32 {
        (self.meta.size.height - 1).div_euclid(CHUNK_SIZE)
    }

    /// Whether a world-space block coordinate lies inside the world volume
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && x < self.meta.size.width
            && y >= 0
            && y < self.meta.size.height
            && z >= 0
            && z < self.meta.size.depth
    }

    /// Get the block at a world coordinate. Out-of-range coordinates and
    /// unloaded chunks read as air.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        if !self.in_bounds(x, y, z) {
            return BlockId::AIR;
        }
        match self.chunks.get(&ChunkCoord::from_block(x, y, z)) {
            Some(chunk) => chunk.get(to_local(x), to_local(y), to_local(z)),
            None => BlockId::AIR,
        }
    }

    /// Set the block at a world coordinate, creating the owning chunk if
    /// needed. Returns false (and does nothing) out of range.
    ///
    /// Neighboring chunks are marked dirty when the edit touches a chunk
    /// border, since their boundary faces may have changed.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        if !self.in_bounds(x, y, z) {
            return false;
        }
        let coord = ChunkCoord::from_block(x, y, z);
        let (lx, ly, lz) = (to_local(x), to_local(y), to_local(z));
        self.get_or_create_chunk(coord).set(lx, ly, lz, id);

        for (local, dx, dy, dz) in [
            (lx, -1, 0, 0),
            (lx, 1, 0, 0),
            (ly, 0, -1, 0),
            (ly, 0, 1, 0),
            (lz, 0, 0, -1),
            (lz, 0, 0, 1),
        ] {
            let at_border = (dx + dy + dz < 0 && local == 0)
                || (dx + dy + dz > 0 && local == CHUNK_SIZE - 1);
            if at_border {
                let neighbor = ChunkCoord::new(coord.x + dx, coord.y + dy, coord.z + dz);
                if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                    chunk.dirty = true;
                }
            }
        }
        true
    }

    /// Get immutable reference to a chunk by coordinate
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Get mutable reference to a chunk by coordinate
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Get a chunk, creating it lazily (empty) if absent
    pub fn get_or_create_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.chunks.entry(coord).or_insert_with(|| Chunk::new(coord))
    }

    /// Insert a chunk. The map key always matches the chunk's own coord.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord, chunk);
    }

    /// Remove a chunk from the world and return it
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterator over all loaded chunks
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Iterator over all loaded chunk coordinates
    pub fn loaded_coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }
}
