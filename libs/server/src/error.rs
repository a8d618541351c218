use deepculture_ai::CompletionError;
use std::path::PathBuf;
use thiserror::Error;

/// A request that cannot be turned into a dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("missing type or subject")]
    MissingTypeOrSubject,

    #[error("index must be a non-negative integer, got {0:?}")]
    InvalidIndex(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The body is not a url-encoded form this endpoint can read.
    #[error("malformed form body: {0}")]
    MalformedForm(String),
}

/// A log record that could not be written.
#[derive(Debug, Error)]
pub enum SessionLogError {
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write log file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The analysis list could not be obtained.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisListError {
    #[error("analysis list request failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("could not decode the reply as a JSON list of analyses. Raw reply: {raw}")]
    Parse { raw: String },
}
