use thiserror::Error;

use crate::paths::PathError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Documents directory not available")]
    NoDocumentsDir,

    #[error("Dialog closed before returning a result")]
    DialogClosed,
}
