//! Block data model: materials, chunks, and the world container

pub mod block;
pub mod chunk;
pub mod world;

pub use block::{BlockId, Material, MaterialRegistry, Transparency};
pub use chunk::{CHUNK_SIZE, CHUNK_VOLUME, Chunk, ChunkCoord};
pub use world::{GameMode, World, WorldMeta, WorldSize};
