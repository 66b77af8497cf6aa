// core/src/error/runner_error.rs
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn process: {program}")]
    Spawn { program: String, #[source] source: std::io::Error },

    #[error("io error while waiting on {program}")]
    Io { program: String, #[source] source: std::io::Error },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },
}
