//! Crate-level error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::bed::BedError;
use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum RemusError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Bed(#[from] BedError),

    #[error("Failed to read registry data from {path}: {source}")]
    Registry {
        path: PathBuf,
        #[source]
        source: BedError,
    },

    #[error("Invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, RemusError>;

impl RemusError {
    pub(crate) fn registry(path: impl Into<PathBuf>, source: BedError) -> Self {
        RemusError::Registry {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_parameter(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RemusError::InvalidParameter {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
