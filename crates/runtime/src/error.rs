//! Errors surfaced by the runtime API.

use combat_content::SpawnError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load content: {0:#}")]
    Content(anyhow::Error),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("failed to read input script {path}")]
    Script {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to write the event log")]
    Io(#[from] std::io::Error),
}
