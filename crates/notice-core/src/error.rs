use std::path::PathBuf;

/// Errors surfaced at the edges of the notice core.
///
/// The aggregation pass itself never fails; these cover config IO and the
/// runtime channel.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notice runtime is not running")]
    RuntimeStopped,
}
