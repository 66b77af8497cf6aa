use std::path::{Path, PathBuf};

use crate::error::PipelineError;

pub const DEFAULT_FRACTIONAL_INTENSITY: f64 = 0.5;

/// Parameters of one run, fixed once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// BIDS label without the `sub-` prefix.
    pub subject_id: String,
    pub fractional_intensity: f64,
    pub robust: bool,
    pub verbose: bool,
}

impl RunConfig {
    /// Builds a validated config. `fractional_intensity` is the raw CLI text.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        subject_id: impl Into<String>,
        fractional_intensity: &str,
        verbose: bool,
    ) -> Result<Self, PipelineError> {
        let cfg = Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            subject_id: subject_id.into(),
            fractional_intensity: parse_fractional_intensity(fractional_intensity)?,
            robust: true,
            verbose,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_robust(mut self, robust: bool) -> Self {
        self.robust = robust;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        check_fractional_intensity(self.fractional_intensity)?;
        check_subject_label(&self.subject_id)?;
        check_utf8_path("input", &self.input_dir)?;
        check_utf8_path("output", &self.output_dir)
    }
}

pub fn parse_fractional_intensity(raw: &str) -> Result<f64, PipelineError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        PipelineError::invalid(
            "fractional_intensity",
            format!("{raw:?} is not a number"),
        )
    })?;
    check_fractional_intensity(value)?;
    Ok(value)
}

fn check_fractional_intensity(value: f64) -> Result<(), PipelineError> {
    // NaN fails both comparisons.
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(PipelineError::invalid(
            "fractional_intensity",
            format!("{value} is outside (0, 1)"),
        ))
    }
}

// Tool arguments and the metadata sidecar are text.
fn check_utf8_path(name: &'static str, path: &Path) -> Result<(), PipelineError> {
    match path.to_str() {
        Some(_) => Ok(()),
        None => Err(PipelineError::invalid(
            name,
            format!("{} is not valid UTF-8", path.display()),
        )),
    }
}

fn check_subject_label(label: &str) -> Result<(), PipelineError> {
    if label.is_empty() {
        return Err(PipelineError::invalid("subject", "subject id is empty"));
    }
    if label.starts_with("sub-") {
        return Err(PipelineError::invalid(
            "subject",
            format!("{label:?} must be given without the sub- prefix"),
        ));
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PipelineError::invalid(
            "subject",
            format!("{label:?} is not an alphanumeric BIDS label"),
        ));
    }
    Ok(())
}
