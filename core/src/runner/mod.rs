pub mod exit;
mod run;
pub mod types;

pub use exit::normalize_exit;
pub use run::{query_output, run_tool};
pub use types::{ToolInvocation, ToolOutput};
