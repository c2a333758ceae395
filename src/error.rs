// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything that can stop a pipeline run.
///
/// All variants are terminal for the current execution. An empty selection is
/// not an error and lives on [`crate::pipeline::View`] instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input path does not exist.
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Every attempted encoding failed to decode the file.
    #[error("could not decode {} with any of: {}", .path.display(), .tried.join(", "))]
    Decode { path: PathBuf, tried: Vec<String> },

    /// Required column missing, duplicate region, or no month columns left.
    #[error("schema error: {0}")]
    Schema(String),

    /// The path exists but reading it failed.
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited record.
    #[error("CSV parse error at record {record}: {source}")]
    Csv {
        record: usize,
        #[source]
        source: csv::Error,
    },

    /// Bad configuration value (unknown encoding label, unreadable YAML, ...).
    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn schema(msg: impl Into<String>) -> Self {
        PipelineError::Schema(msg.into())
    }
}
