use std::io;
use std::path::PathBuf;

use mirror_core::CoreError;
use mirror_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The core refused a message; the state is unchanged.
    #[error("rejected: {0}")]
    Rejected(#[from] CoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("replay file {path:?} line {line}: {source}")]
    Replay {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
