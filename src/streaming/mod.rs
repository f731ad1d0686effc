//! Chunk streaming
//!
//! Keeps a cylinder of chunk columns around the observer resident and
//! meshed, doing a bounded amount of work per tick.

pub mod active_set;
pub mod scheduler;

pub use active_set::ActiveRegion;
pub use scheduler::{StreamingConfig, StreamingScheduler};
