//! On-disk world persistence
//!
//! World directory layout:
//!   `<world>/world.json`                  metadata
//!   `<world>/chunks/chunk_{x}_{y}_{z}.bin` raw chunk payloads
//!   `<world>/players/<name>.dat`           binary player state
//!   `<world>/players/<name>.json`          legacy player state (read-only)

pub mod chunk_store;
pub mod player;
pub mod world_meta;

pub use chunk_store::ChunkStore;
pub use player::{PlayerRecord, PlayerStore, sanitize_username};
pub use world_meta::{load_world_meta, save_world_meta};
