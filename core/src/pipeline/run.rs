use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::backend::{BackendPlan, ExtractionBackend, ExtractionRequest};
use crate::bids::SubjectLayout;
use crate::config::RunConfig;
use crate::error::PipelineError;
use crate::metadata::{
    write_metadata, RunMetadata, RunParameters, RunStatus, SoftwareVersions, ToolRecord,
    PIPELINE_VERSION,
};

/// Skull-strips one subject.
///
/// Steps run strictly in order: validate, preflight the tool, prepare the
/// output directory, invoke the tool, record metadata. Nothing is retried.
/// Failing to write the metadata sidecar after a successful extraction is
/// logged as a warning and does not fail the run.
pub async fn run(
    config: &RunConfig,
    backend: &dyn ExtractionBackend,
) -> Result<RunMetadata, PipelineError> {
    config.validate()?;
    tracing::info!(
        target: "skullstrip.pipeline",
        subject = %config.subject_id,
        fractional_intensity = config.fractional_intensity,
        robust = config.robust,
        "processing subject"
    );

    let layout = SubjectLayout::new(&config.input_dir, &config.output_dir, &config.subject_id);
    validate_input(config, &layout)?;

    backend
        .preflight()
        .map_err(|reason| PipelineError::ToolNotFound {
            tool: backend.name().to_string(),
            reason,
        })?;

    prepare_output(&layout.subject_output_dir)?;

    let request = ExtractionRequest {
        input_image: &layout.input_image,
        output_image: &layout.output_image,
        fractional_intensity: config.fractional_intensity,
        robust: config.robust,
    };
    let plan = backend.plan(&request);
    // Whatever the tool leaves at these paths must come from this run.
    clear_stale_outputs(&plan)?;

    let produced = match invoke(backend, &plan).await {
        Ok(path) => path,
        Err(err) => {
            remove_partial_outputs(&plan);
            let mut record = build_metadata(
                config,
                &layout,
                &layout.output_image,
                backend,
                &plan,
                RunStatus::Failure,
            )
            .await;
            record.error = Some(err.to_string());
            if let Err(warning) = write_metadata(&layout.metadata_path, &record) {
                tracing::warn!(target: "skullstrip.pipeline", error = %warning, "failure metadata not written");
            }
            return Err(err);
        }
    };
    tracing::info!(target: "skullstrip.pipeline", output = %produced.display(), "brain extraction completed");

    let metadata =
        build_metadata(config, &layout, &produced, backend, &plan, RunStatus::Success).await;
    if let Err(warning) = write_metadata(&layout.metadata_path, &metadata) {
        tracing::warn!(
            target: "skullstrip.pipeline",
            error = %warning,
            cause = %warning.source,
            "extracted image is in place but metadata could not be written"
        );
    }

    Ok(metadata)
}

fn validate_input(config: &RunConfig, layout: &SubjectLayout) -> Result<(), PipelineError> {
    if !config.input_dir.is_dir() {
        return Err(PipelineError::InputNotFound {
            path: config.input_dir.clone(),
        });
    }
    if !layout.input_image.is_file() {
        return Err(PipelineError::InputNotFound {
            path: layout.input_image.clone(),
        });
    }
    tracing::debug!(target: "skullstrip.pipeline", input = %layout.input_image.display(), "input validated");
    Ok(())
}

fn prepare_output(dir: &Path) -> Result<(), PipelineError> {
    let not_writable = |source| PipelineError::OutputNotWritable {
        path: dir.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(not_writable)?;
    // Dropping the probe removes it.
    tempfile::Builder::new()
        .prefix(".skullstrip-probe")
        .tempfile_in(dir)
        .map_err(not_writable)?;
    Ok(())
}

async fn invoke(
    backend: &dyn ExtractionBackend,
    plan: &BackendPlan,
) -> Result<PathBuf, PipelineError> {
    let tool = backend.name().to_string();
    let output = backend
        .extract(plan)
        .await
        .map_err(|err| {
            let detail = match std::error::Error::source(&err) {
                Some(cause) => format!("{err}: {cause}"),
                None => err.to_string(),
            };
            PipelineError::ExternalToolFailure {
                tool: tool.clone(),
                code: None,
                stderr: detail,
            }
        })?;

    if !output.success() {
        tracing::error!(
            target: "skullstrip.pipeline",
            tool = %tool,
            exit_code = output.exit_code,
            stderr = %output.stderr.trim(),
            "extraction tool failed"
        );
        return Err(PipelineError::ExternalToolFailure {
            tool,
            code: Some(output.exit_code),
            stderr: output.stderr.trim().to_string(),
        });
    }

    plan.output_candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| PipelineError::ExternalToolFailure {
            tool,
            code: Some(output.exit_code),
            stderr: format!(
                "exited successfully but wrote none of: {}",
                plan.output_candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
}

fn clear_stale_outputs(plan: &BackendPlan) -> Result<(), PipelineError> {
    for path in plan.output_candidates.iter().filter(|p| p.exists()) {
        std::fs::remove_file(path).map_err(|source| PipelineError::OutputNotWritable {
            path: path.clone(),
            source,
        })?;
        tracing::info!(
            target: "skullstrip.pipeline",
            path = %path.display(),
            "removed output image from an earlier run"
        );
    }
    Ok(())
}

fn remove_partial_outputs(plan: &BackendPlan) {
    for path in plan.output_candidates.iter().filter(|p| p.exists()) {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::info!(
                target: "skullstrip.pipeline",
                path = %path.display(),
                "removed partial output"
            ),
            Err(e) => tracing::warn!(
                target: "skullstrip.pipeline",
                path = %path.display(),
                error = %e,
                "could not remove partial output"
            ),
        }
    }
}

async fn build_metadata(
    config: &RunConfig,
    layout: &SubjectLayout,
    output: &Path,
    backend: &dyn ExtractionBackend,
    plan: &BackendPlan,
    status: RunStatus,
) -> RunMetadata {
    let external_tool = backend.version().await;
    tracing::debug!(target: "skullstrip.pipeline", version = %external_tool, "external tool version");

    RunMetadata {
        timestamp: Utc::now().to_rfc3339(),
        status,
        input_path: layout.input_image.display().to_string(),
        output_path: output.display().to_string(),
        parameters: RunParameters {
            subject_id: config.subject_id.clone(),
            fractional_intensity: config.fractional_intensity,
            robust: config.robust,
        },
        software_versions: SoftwareVersions {
            external_tool,
            pipeline: PIPELINE_VERSION.to_string(),
        },
        tool: ToolRecord {
            name: backend.name().to_string(),
            command: plan.invocation.command_line(),
        },
        error: None,
    }
}
