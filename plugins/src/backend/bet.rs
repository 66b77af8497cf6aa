//! FSL BET (Brain Extraction Tool) backend.
//!
//! Invoked as `bet <input> <output_base> -f <fi> [-R]`. BET appends the
//! NIfTI extension to `output_base` itself, normally `.nii.gz` but `.nii`
//! when `FSLOUTPUTTYPE=NIFTI`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use skullstrip_core::api as core_api;
use skullstrip_core::bids::{nifti_candidates, strip_nifti_extension};

pub struct BetBackend {
    bin: String,
    path_prefix: Option<String>,
    version_timeout: Duration,
    fsl_dir: Option<PathBuf>,
}

impl BetBackend {
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            path_prefix: None,
            version_timeout: Duration::from_secs(5),
            fsl_dir: None,
        }
    }

    /// Builds from config; `FSLDIR` is read from the environment.
    pub fn from_config(cfg: &core_api::ToolConfig) -> Self {
        Self::new(cfg.bin.clone())
            .with_path_prefix(cfg.path_prefix.clone())
            .with_version_timeout(Duration::from_millis(cfg.version_timeout_ms))
            .with_fsl_dir(std::env::var_os("FSLDIR").map(PathBuf::from))
    }

    pub fn with_path_prefix(mut self, prefix: Option<String>) -> Self {
        self.path_prefix = prefix.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_version_timeout(mut self, timeout: Duration) -> Self {
        self.version_timeout = timeout;
        self
    }

    pub fn with_fsl_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.fsl_dir = dir;
        self
    }

    /// PATH lookup first, then `$FSLDIR/bin`.
    fn resolve(&self) -> Result<PathBuf, String> {
        if let Ok(path) = which::which(&self.bin) {
            return Ok(path);
        }
        if let Some(dir) = &self.fsl_dir {
            let candidate = dir.join("bin").join(&self.bin);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(match &self.fsl_dir {
            Some(dir) => format!(
                "{} not found on PATH or in {}",
                self.bin,
                dir.join("bin").display()
            ),
            None => format!("{} not found on PATH and FSLDIR is unset", self.bin),
        })
    }

    fn command(&self) -> String {
        self.resolve()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| self.bin.clone())
    }

    fn base_invocation(&self) -> core_api::ToolInvocation {
        let mut inv = core_api::ToolInvocation::new(self.command());
        if let Some(path) = self.prefixed_path() {
            inv = inv.env("PATH", path);
        }
        inv
    }

    fn prefixed_path(&self) -> Option<String> {
        let prefix = self.path_prefix.as_ref()?;
        let existing = std::env::var_os("PATH").unwrap_or_default();
        let dirs = std::iter::once(PathBuf::from(prefix)).chain(std::env::split_paths(&existing));
        std::env::join_paths(dirs)
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }

    async fn fsl_release(&self) -> Option<String> {
        let file = self.fsl_dir.as_ref()?.join("etc").join("fslversion");
        let text = tokio::fs::read_to_string(&file).await.ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| format!("FSL {text}"))
    }
}

#[async_trait]
impl core_api::ExtractionBackend for BetBackend {
    fn name(&self) -> &str {
        "bet"
    }

    fn preflight(&self) -> Result<(), String> {
        let path = self.resolve()?;
        tracing::debug!(target: "skullstrip.bet", path = %path.display(), "bet resolved");
        Ok(())
    }

    fn plan(&self, request: &core_api::ExtractionRequest<'_>) -> core_api::BackendPlan {
        let output_base = strip_nifti_extension(request.output_image);

        let mut inv = self
            .base_invocation()
            .arg(path_arg(request.input_image))
            .arg(path_arg(&output_base))
            .arg("-f")
            .arg(request.fractional_intensity.to_string());
        if request.robust {
            inv = inv.arg("-R");
        }

        tracing::info!(
            target: "skullstrip.bet",
            command = %inv.command_line(),
            "planned bet invocation"
        );

        core_api::BackendPlan {
            invocation: inv,
            output_candidates: nifti_candidates(&output_base).to_vec(),
        }
    }

    async fn version(&self) -> String {
        let query = self.base_invocation().arg("-V");
        match core_api::query_output(&query, self.version_timeout).await {
            Ok(out) if out.success() && !out.stdout.trim().is_empty() => {
                return out.stdout.trim().to_string();
            }
            Ok(out) => tracing::debug!(
                target: "skullstrip.bet",
                exit_code = out.exit_code,
                "bet -V gave no version"
            ),
            Err(e) => tracing::debug!(target: "skullstrip.bet", error = %e, "bet -V failed"),
        }

        match self.fsl_release().await {
            Some(v) => v,
            None => {
                tracing::warn!(target: "skullstrip.bet", "could not determine bet version");
                core_api::UNKNOWN_VERSION.to_string()
            }
        }
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
