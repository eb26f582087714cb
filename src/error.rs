use std::path::PathBuf;

/// Crate-wide error type.
///
/// Acquisition and export recover locally from most failures (skip the item,
/// keep going); training and evaluation propagate these variants up to the
/// binary, which prints the diagnostic and aborts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("training data directory not found: {0}")]
    TrainDirMissing(PathBuf),

    #[error("missing class directories: {0:?}")]
    MissingClassDirs(Vec<String>),

    #[error("no usable images found under the training data directory")]
    EmptyDataset,
}

pub type Result<T> = std::result::Result<T, Error>;
