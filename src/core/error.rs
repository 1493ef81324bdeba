//! Error types for terrastream

use thiserror::Error;

/// Main error type for the crate
///
/// Only configuration and I/O can fail. The streaming core itself treats
/// missing chunks and out-of-range cells as absent data, not errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
