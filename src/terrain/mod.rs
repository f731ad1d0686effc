//! Deterministic procedural terrain generation

pub mod noise;
pub mod generator;

pub use generator::{TerrainGenerator, WorldGenJob};
