mod writer;

use serde::{Deserialize, Serialize};

pub use writer::write_metadata;

pub const PIPELINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub subject_id: String,
    pub fractional_intensity: f64,
    pub robust: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareVersions {
    pub external_tool: String,
    pub pipeline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub name: String,
    pub command: String,
}

/// Provenance sidecar written next to the extracted image.
///
/// Field order is the serialized key order; everything except `timestamp`
/// is a pure function of the run's inputs and the tool's version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub timestamp: String,
    pub status: RunStatus,
    pub input_path: String,
    pub output_path: String,
    pub parameters: RunParameters,
    pub software_versions: SoftwareVersions,
    pub tool: ToolRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunMetadata {
    pub fn external_tool_version(&self) -> &str {
        &self.software_versions.external_tool
    }
}
