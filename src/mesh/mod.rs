//! Chunk surface extraction

pub mod mesher;

pub use mesher::{ChunkMesh, MeshVertex, build_chunk_mesh, validate};
