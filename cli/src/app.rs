use skullstrip_core::api::{self as core_api, RunConfig};
use skullstrip_core::config;
use skullstrip_plugins::factory;

use crate::commands::cli::Args;
use crate::logging;

/// Runs one subject and returns the process exit code.
pub async fn run_app(args: Args) -> i32 {
    let mut cfg = match config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("skullstrip: {e:#}");
            return 1;
        }
    };
    if let Some(bin) = &args.bet_bin {
        cfg.tool.bin = bin.clone();
    }

    let _guard = match logging::init(&cfg.logging, args.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("skullstrip: {e:#}");
            return 1;
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %args.input.display(),
        output = %args.output.display(),
        "brain extraction preprocessing pipeline"
    );

    let run_cfg = match RunConfig::new(
        &args.input,
        &args.output,
        args.subject.as_str(),
        &args.fractional_intensity,
        args.verbose,
    ) {
        Ok(c) => c.with_robust(cfg.tool.robust && !args.no_robust),
        Err(e) => return report(e),
    };

    let backend = factory::build_backend(&cfg);
    match core_api::run(&run_cfg, backend.as_ref()).await {
        Ok(metadata) => {
            tracing::info!(
                output = %metadata.output_path,
                bet_version = %metadata.external_tool_version(),
                "processing completed successfully"
            );
            0
        }
        Err(e) => report(e),
    }
}

fn report(err: core_api::PipelineError) -> i32 {
    tracing::error!(error = %err, "processing failed");
    err.exit_code()
}
