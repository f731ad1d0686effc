//! Chunks: fixed-size cubic grids of block ids
//!
//! A chunk is the unit of generation, meshing, streaming, and persistence.
//! Block ids are stored as a flat byte array, x fastest, then z, then y.

use crate::core::types::Vec3;
use crate::world::block::BlockId;

/// Blocks per chunk side
pub const CHUNK_SIZE: i32 = 16;

/// Blocks per chunk
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Integer coordinate identifying a chunk in the world grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk containing the given world-space block coordinate
    pub fn from_block(x: i32, y: i32, z: i32) -> Self {
        Self {
            x: x.div_euclid(CHUNK_SIZE),
            y: y.div_euclid(CHUNK_SIZE),
            z: z.div_euclid(CHUNK_SIZE),
        }
    }

    /// Chunk containing the given world-space position
    pub fn from_world_pos(pos: Vec3) -> Self {
        Self::from_block(
            pos.x.floor() as i32,
            pos.y.floor() as i32,
            pos.z.floor() as i32,
        )
    }

    /// World-space block coordinate of this chunk's minimum corner
    pub fn block_origin(&self) -> (i32, i32, i32) {
        (
            self.x * CHUNK_SIZE,
            self.y * CHUNK_SIZE,
            self.z * CHUNK_SIZE,
        )
    }

    /// World-space position of this chunk's minimum corner
    pub fn world_origin(&self) -> Vec3 {
        Vec3::new(
            (self.x * CHUNK_SIZE) as f32,
            (self.y * CHUNK_SIZE) as f32,
            (self.z * CHUNK_SIZE) as f32,
        )
    }

    /// File name this chunk persists under
    pub fn file_name(&self) -> String {
        format!("chunk_{}_{}_{}.bin", self.x, self.y, self.z)
    }
}

/// Convert a world-space block coordinate to chunk-local 0..CHUNK_SIZE
pub fn to_local(v: i32) -> i32 {
    v.rem_euclid(CHUNK_SIZE)
}

/// A single chunk of block data
pub struct Chunk {
    /// Coordinate of this chunk in the world grid
    pub coord: ChunkCoord,
    /// Flat block-id array, indexed x + z*16 + y*256
    blocks: Box<[u8; CHUNK_VOLUME]>,
    /// Cached render geometry for this chunk is stale
    pub dirty: bool,
    /// Chunk differs from what deterministic regeneration would produce
    /// and must be saved before it is unloaded
    pub modified: bool,
}

impl Chunk {
    /// Create a new chunk filled with air
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: Box::new([0; CHUNK_VOLUME]),
            dirty: true,
            modified: false,
        }
    }

    /// Create a chunk from an existing block array (disk load or snapshot)
    pub fn from_blocks(coord: ChunkCoord, blocks: &[u8]) -> Self {
        let mut chunk = Self::new(coord);
        chunk.blocks.copy_from_slice(blocks);
        chunk
    }

    fn index(x: i32, y: i32, z: i32) -> usize {
        debug_assert!(
            (0..CHUNK_SIZE).contains(&x)
                && (0..CHUNK_SIZE).contains(&y)
                && (0..CHUNK_SIZE).contains(&z)
        );
        (x + z * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE) as usize
    }

    /// Get the block at a chunk-local coordinate
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockId {
        BlockId(self.blocks[Self::index(x, y, z)])
    }

    /// Set the block at a chunk-local coordinate, marking the chunk dirty
    /// and in need of saving
    pub fn set(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        self.blocks[Self::index(x, y, z)] = id.0;
        self.dirty = true;
        self.modified = true;
    }

    /// Write a block during generation: marks the chunk dirty for meshing
    /// but not modified, since regeneration reproduces it exactly
    pub fn set_generated(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        self.blocks[Self::index(x, y, z)] = id.0;
        self.dirty = true;
    }

    /// Raw block payload, as persisted and as sent over the wire
    pub fn blocks(&self) -> &[u8; CHUNK_VOLUME] {
        &self.blocks
    }

    /// Replace the whole block array from a network snapshot.
    /// Marks the chunk dirty so it is remeshed; a snapshot is authoritative
    /// so the chunk is also considered modified relative to regeneration.
    pub fn copy_from_snapshot(&mut self, blocks: &[u8]) {
        self.blocks.copy_from_slice(blocks);
        self.dirty = true;
        self.modified = true;
    }

    /// True if every block is air
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&b| b == 0)
    }
}
