//! BIDS path layout for a single subject.

use std::path::{Path, PathBuf};

pub const METADATA_FILE_NAME: &str = "processing_metadata.json";

const NIFTI_GZ: &str = ".nii.gz";
const NIFTI: &str = ".nii";

/// Every path a run reads or writes for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectLayout {
    pub input_image: PathBuf,
    pub subject_output_dir: PathBuf,
    pub output_image: PathBuf,
    pub metadata_path: PathBuf,
}

impl SubjectLayout {
    pub fn new(input_dir: &Path, output_dir: &Path, subject_id: &str) -> Self {
        let sub = format!("sub-{subject_id}");
        let input_image = input_dir
            .join(&sub)
            .join("anat")
            .join(format!("{sub}_T1w{NIFTI_GZ}"));
        let subject_output_dir = output_dir.join(&sub);
        let output_image = subject_output_dir.join(format!("{sub}_T1w_brain{NIFTI_GZ}"));
        let metadata_path = subject_output_dir.join(METADATA_FILE_NAME);

        Self {
            input_image,
            subject_output_dir,
            output_image,
            metadata_path,
        }
    }
}

/// Drops a trailing `.nii.gz` or `.nii`, leaving other paths untouched.
pub fn strip_nifti_extension(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    let stem = s
        .strip_suffix(NIFTI_GZ)
        .or_else(|| s.strip_suffix(NIFTI))
        .unwrap_or(&s);
    PathBuf::from(stem)
}

/// Files a NIfTI writer may produce for `base`, compressed first.
pub fn nifti_candidates(base: &Path) -> [PathBuf; 2] {
    let s = base.to_string_lossy();
    [
        PathBuf::from(format!("{s}{NIFTI_GZ}")),
        PathBuf::from(format!("{s}{NIFTI}")),
    ]
}
