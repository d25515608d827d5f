// ============================================================
// Layer 3 — Pipeline Error Taxonomy
// ============================================================
// Every failure the workflows can name lives here.
//
// The application layer works with anyhow::Result and adds
// context as errors travel upwards, but the *kind* of failure
// is always one of these variants so callers can match on it:
//
//   ConfigNotFound / ConfigMalformed   → fatal during training
//   MissingHyperparameter / Invalid…   → fatal during training
//   ArtifactNotFound                   → recovered during inference
//   DatasetUnavailable                 → fatal everywhere
//   IndexOutOfRange                    → fatal during inference
//
// thiserror derives Display and std::error::Error so these
// convert into anyhow::Error with the `?` operator.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration path does not resolve to a readable file
    #[error("configuration file '{}' not found", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but is not a JSON object
    #[error("configuration file '{}' is malformed: {reason}", .path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    #[error("required hyperparameter '{0}' is missing from the configuration")]
    MissingHyperparameter(&'static str),

    #[error("hyperparameter '{key}' must be {expected}")]
    InvalidHyperparameter { key: &'static str, expected: &'static str },

    #[error("unsupported solver '{0}' (expected one of: lbfgs, sgd, adam, rmsprop)")]
    UnsupportedSolver(String),

    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// No model artifact at the expected path
    #[error("model artifact '{}' not found", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("model artifact '{}' is unreadable: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("sample index {index} is out of range for a dataset of {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
