//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `skullstrip_core::api` instead of reaching into internal modules.

pub use crate::backend::{BackendPlan, ExtractionBackend, ExtractionRequest, UNKNOWN_VERSION};
pub use crate::bids::SubjectLayout;
pub use crate::config::{AppConfig, LoggingConfig, RunConfig, ToolConfig, DEFAULT_FRACTIONAL_INTENSITY};
pub use crate::error::{MetadataWriteWarning, PipelineError, RunnerError};
pub use crate::metadata::{RunMetadata, RunStatus};
pub use crate::pipeline::run;
pub use crate::runner::{query_output, run_tool, ToolInvocation, ToolOutput};
