mod load;
mod run_config;
mod types;

pub use load::{apply_env_overrides, load, CONFIG_FILE_NAME};
pub use run_config::{parse_fractional_intensity, RunConfig, DEFAULT_FRACTIONAL_INTENSITY};
pub use types::{AppConfig, LoggingConfig, ToolConfig};
