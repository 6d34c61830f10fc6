use std::path::PathBuf;
use thiserror::Error;

/// Why a single file could not be turned into an image source
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no data read from {}", path.display())]
    Empty { path: PathBuf },

    #[error("decode task failed: {0}")]
    Join(String),
}
