use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Binary name (resolved on PATH) or absolute path of the extraction tool.
    #[serde(default = "default_tool_bin")]
    pub bin: String,

    /// Pass `-R` (robust brain centre estimation).
    #[serde(default = "default_robust")]
    pub robust: bool,

    /// Prepended to the tool's PATH; BET shells out to `dc` and friends.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: Option<String>,

    #[serde(default = "default_version_timeout_ms")]
    pub version_timeout_ms: u64,
}

fn default_tool_bin() -> String {
    "bet".to_string()
}

fn default_robust() -> bool {
    true
}

fn default_path_prefix() -> Option<String> {
    Some("/usr/bin".to_string())
}

fn default_version_timeout_ms() -> u64 {
    5_000
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            bin: default_tool_bin(),
            robust: default_robust(),
            path_prefix: default_path_prefix(),
            version_timeout_ms: default_version_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// When set, logs are also appended to `<directory>/skullstrip.log`.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}
