//! Error types for job rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for job rendering operations.
pub type JenkinsResult<T> = Result<T, JenkinsError>;

/// Errors that can occur while rendering Jenkins jobs.
#[derive(Error, Debug)]
pub enum JenkinsError {
    #[error("Partial template not found: {path}")]
    MissingPartial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Partial templates nested deeper than {0} levels")]
    IncludeDepth(usize),

    #[error("Job DSL tool exited with status {status}: {stderr}")]
    ToolFailed { status: i32, stderr: String },

    #[error("Job DSL tool produced no job documents")]
    NoOutput,

    #[error("Invalid output pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed reading tool output: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
