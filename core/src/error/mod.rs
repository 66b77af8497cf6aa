mod pipeline_error;
mod runner_error;

pub use pipeline_error::{MetadataWriteWarning, PipelineError};
pub use runner_error::RunnerError;
