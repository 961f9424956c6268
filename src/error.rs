//! Error types. `ModelLoadError` is the only failure that halts an interaction;
//! the rest surface classifier faults or rejected input.

use std::path::PathBuf;
use thiserror::Error;

/// The classifier artifact could not be turned into a usable model.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("model artifact '{}' not found", path.display())]
    Missing { path: PathBuf },
    #[error("model artifact '{}' could not be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact '{}' is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("model artifact '{}' is incompatible with the feature schema: {reason}", path.display())]
    Incompatible { path: PathBuf, reason: String },
    #[error("model artifact '{}' has an unsupported format (expected .onnx or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("model artifact '{}' cannot be loaded, ONNX Runtime unavailable: {reason}", path.display())]
    RuntimeUnavailable { path: PathBuf, reason: String },
    #[error("model artifact '{}' rejected by ONNX Runtime: {source}", path.display())]
    Runtime {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },
}

impl ModelLoadError {
    /// Artifact the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            ModelLoadError::Missing { path }
            | ModelLoadError::Unreadable { path, .. }
            | ModelLoadError::Corrupt { path, .. }
            | ModelLoadError::Incompatible { path, .. }
            | ModelLoadError::UnsupportedFormat { path }
            | ModelLoadError::RuntimeUnavailable { path, .. }
            | ModelLoadError::Runtime { path, .. } => path,
        }
    }
}

/// Failure raised by a classifier while scoring a vector.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("inference failed: {0}")]
    Runtime(#[from] ort::Error),
    #[error("model produced no output named '{0}'")]
    MissingOutput(String),
    #[error("model output has {len} columns; class index {class} out of range")]
    BadShape { len: usize, class: usize },
    #[error("model returned invalid probability {0}")]
    InvalidProbability(f64),
}

/// Borrower attribute outside the accepted domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} = {value} is not one of {allowed:?}")]
    InvalidCode {
        field: &'static str,
        value: u8,
        allowed: &'static [u8],
    },
}

/// Failure of one scoring interaction after the model is loaded.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
