//! Cubeworld - a block world engine with streaming, meshing and replication

pub mod core;
pub mod math;
pub mod world;
pub mod terrain;
pub mod mesh;
pub mod streaming;
pub mod net;
pub mod persist;
