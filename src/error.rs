use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for results returned by the pipeline modules.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures raised while building or reading a feature corpus.
///
/// `DecodeFailure`, `MalformedName` and `UnrecognizedLabel` are per-file and
/// never escape [`crate::corpus::DatasetBuilder::build`]; they only show up
/// as skipped rows and log lines.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to extract features from {}: {message}", .path.display())]
    DecodeFailure { path: PathBuf, message: String },

    #[error("filename {name:?} has too few '-' separated tokens to resolve an emotion code")]
    MalformedName { name: String },

    #[error("emotion code {code:?} is not in the label table")]
    UnrecognizedLabel { code: String },

    #[error("no features were extracted from any file under {}", .root.display())]
    EmptyCorpus { root: PathBuf },

    #[error("input root {} does not exist or is not a directory", .0.display())]
    MissingInputRoot(PathBuf),

    #[error("index {index} is out of range for a split of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("corpus table schema mismatch: {0}")]
    Schema(String),

    #[error("failed to (de)serialize corpus table: {0}")]
    Serialization(String),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors that only exclude a single file from the corpus.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::DecodeFailure { .. } | Self::MalformedName { .. } | Self::UnrecognizedLabel { .. }
        )
    }
}
