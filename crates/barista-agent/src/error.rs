//! Error types for the order-taking core.

use std::path::PathBuf;

/// Hard failures of the finalization flow.
///
/// Soft outcomes (invalid size, incomplete order, duplicate extra) are never
/// errors; they are returned to the model as ordinary messages.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The orders directory could not be created.
    #[error("failed to create orders directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The order file could not be written.
    #[error("failed to write order file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The order could not be serialized to JSON.
    #[error("order serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
