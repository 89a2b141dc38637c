//! Error types in flightforest
//!

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::record::ParseError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed record on line {line} ({record:?}): {source}")]
    Parse {
        line: usize,
        record: String,
        source: ParseError,
    },
    #[error("cannot read input {}: {source}", .path.display())]
    Input { path: PathBuf, source: io::Error },
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("training failed: {0}")]
    Training(String),
    #[error("training backend error: {0}")]
    Backend(#[from] linfa::error::Error),
    #[error("dataset contains no examples")]
    EmptyDataset,
    #[error("{targets} labels cannot be paired with {predictions} predictions")]
    LengthMismatch { targets: usize, predictions: usize },
    #[error("cannot store model at {}: {reason}", .path.display())]
    Storage {
        path: PathBuf,
        reason: StorageFailure,
    },
    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

/// Reason a model could not be written to or read from its destination
#[derive(Error, Debug)]
pub enum StorageFailure {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("destination already exists")]
    AlreadyExists,
    #[error("incompatible contents: {0}")]
    Incompatible(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>, reason: impl Into<StorageFailure>) -> Self {
        Error::Storage {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
