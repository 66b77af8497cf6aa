//! The seam between the pipeline driver and a concrete extraction tool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::RunnerError;
use crate::runner::{run_tool, ToolInvocation, ToolOutput};

/// Recorded when a tool's version cannot be determined.
pub const UNKNOWN_VERSION: &str = "unknown";

#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub input_image: &'a Path,
    pub output_image: &'a Path,
    pub fractional_intensity: f64,
    pub robust: bool,
}

#[derive(Debug, Clone)]
pub struct BackendPlan {
    pub invocation: ToolInvocation,
    /// Files the tool may write, in order of preference. Anything here is
    /// removed if the tool fails.
    pub output_candidates: Vec<PathBuf>,
}

#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap availability check run before any output is touched.
    fn preflight(&self) -> Result<(), String>;

    fn plan(&self, request: &ExtractionRequest<'_>) -> BackendPlan;

    /// Best-effort version string; [`UNKNOWN_VERSION`] when unavailable.
    async fn version(&self) -> String;

    async fn extract(&self, plan: &BackendPlan) -> Result<ToolOutput, RunnerError> {
        run_tool(&plan.invocation).await
    }
}
