//! Error types for the engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("persistence error: {0}")]
    Persist(String),

    #[error("network error: {0}")]
    Net(String),

    #[error("mesh error: {0}")]
    Mesh(String),
}
