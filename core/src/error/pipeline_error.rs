// core/src/error/pipeline_error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Fatal outcomes of a pipeline run. None of them are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("output directory not writable: {}", path.display())]
    OutputNotWritable { path: PathBuf, #[source] source: std::io::Error },

    #[error("{tool} not available: {reason}")]
    ToolNotFound { tool: String, reason: String },

    #[error("{tool} failed (exit code {code:?}): {stderr}")]
    ExternalToolFailure {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl PipelineError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Process exit code reported by the CLI for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::InvalidParameter { .. } => 2,
            PipelineError::InputNotFound { .. } => 3,
            PipelineError::OutputNotWritable { .. } => 4,
            PipelineError::ExternalToolFailure { .. } => 5,
            PipelineError::ToolNotFound { .. } => 6,
        }
    }
}

/// Writing the metadata sidecar failed after the image was produced.
///
/// Logged, never turned into a failed run.
#[derive(Debug, Error)]
#[error("failed to write metadata to {}", path.display())]
pub struct MetadataWriteWarning {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
