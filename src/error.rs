//! Defines the error type shared by the whole crate.
use thiserror::Error;

use std::path::PathBuf;


/// A shorthand for `std::result::Result<T, minilabels::Error>`.
pub type Result<T> = std::result::Result<T, Error>;


/// Every failure in this crate is fatal for the invoking process.
/// There is no retry path, so each variant carries enough context
/// to be printed as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong number of command-line arguments.
    #[error("usage: {0}")]
    Usage(String),

    /// A required configuration key is absent.
    #[error("configuration key `{key}` is missing")]
    ConfigKeyMissing {
        /// The missing key.
        key: String,
    },

    /// A configuration value cannot be read as the requested type.
    #[error("configuration key `{key}` has value `{value}`, expected {expected}")]
    ConfigTypeMismatch {
        /// The offending key.
        key: String,
        /// The raw value found in the document.
        value: String,
        /// A human readable name of the expected type.
        expected: &'static str,
    },

    /// `train.warmStart` is none of `false`, `true`, `auto`.
    #[error("invalid warm-start mode `{0}`, expected one of `false`, `true`, `auto`")]
    InvalidWarmStartMode(String),

    /// A persisted model is missing or cannot be decoded.
    #[error("failed to load the model from {path:?}: {source}")]
    ModelLoad {
        /// Path of the persisted model.
        path: PathBuf,
        /// Underlying reason.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A model cannot be written to disk.
    #[error("failed to save the model to {path:?}: {source}")]
    ModelSave {
        /// Destination path.
        path: PathBuf,
        /// Underlying reason.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A dataset line does not follow the multi-label SVMLight format.
    #[error("malformed sample at line {line}: {message}")]
    SampleFormat {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A model cannot be built from the training sample.
    #[error("the training sample {0}")]
    EmptySample(&'static str),

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
