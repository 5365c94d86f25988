//! Error types for field construction and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or loading a scalar field.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("value buffer holds {actual} samples, shape expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not an npy file")]
    BadMagic { path: PathBuf },

    #[error("malformed npy header: {0}")]
    MalformedHeader(String),

    #[error("unsupported npy array: {0}")]
    Unsupported(String),
}

pub type FieldResult<T> = Result<T, FieldError>;
