use std::io::Write;
use std::path::Path;

use crate::error::MetadataWriteWarning;

use super::RunMetadata;

/// Writes `metadata` as pretty JSON via a temp file in the same directory,
/// so readers never see a half-written sidecar.
pub fn write_metadata(path: &Path, metadata: &RunMetadata) -> Result<(), MetadataWriteWarning> {
    let warn = |source: std::io::Error| MetadataWriteWarning {
        path: path.to_path_buf(),
        source,
    };

    let mut json = serde_json::to_string_pretty(metadata).map_err(|e| warn(e.into()))?;
    json.push('\n');

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".processing_metadata")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(warn)?;
    tmp.write_all(json.as_bytes()).map_err(warn)?;
    tmp.persist(path).map_err(|e| warn(e.error))?;

    tracing::info!(target: "skullstrip.metadata", path = %path.display(), "metadata saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{RunParameters, RunStatus, SoftwareVersions, ToolRecord};
    use pretty_assertions::assert_eq;

    fn sample() -> RunMetadata {
        RunMetadata {
            timestamp: "2024-12-01T10:00:00+00:00".into(),
            status: RunStatus::Success,
            input_path: "/data/sub-01/anat/sub-01_T1w.nii.gz".into(),
            output_path: "/results/sub-01/sub-01_T1w_brain.nii.gz".into(),
            parameters: RunParameters {
                subject_id: "01".into(),
                fractional_intensity: 0.5,
                robust: true,
            },
            software_versions: SoftwareVersions {
                external_tool: "unknown".into(),
                pipeline: "0.1.0".into(),
            },
            tool: ToolRecord {
                name: "bet".into(),
                command: "bet in out -f 0.5 -R".into(),
            },
            error: None,
        }
    }

    #[test]
    fn writes_parseable_json_with_expected_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processing_metadata.json");
        write_metadata(&path, &sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["parameters"]["fractional_intensity"], 0.5);
        assert_eq!(v["software_versions"]["external_tool"], "unknown");
        assert!(v.get("error").is_none());

        let back: RunMetadata = serde_json::from_str(&text).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processing_metadata.json");
        write_metadata(&path, &sample()).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("processing_metadata.json")]);
    }

    #[test]
    fn unwritable_target_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processing_metadata.json");
        std::fs::create_dir(&path).unwrap();
        let warning = write_metadata(&path, &sample()).unwrap_err();
        assert_eq!(warning.path, path);
    }
}
