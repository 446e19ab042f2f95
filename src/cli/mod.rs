//! CLI entrypoint module structure.
use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::{
    config::LauncherConfig,
    job::{execute_plan, plan_job, JobRequest, LaunchContext, LaunchPlan},
    lib::{
        errors::LaunchError,
        process::{StepRunner, SystemRunner},
        telemetry::{self, LaunchTelemetry, RunSpan},
    },
};

pub mod args;
pub mod exit;
pub mod profile;

pub use args::LaunchArgs;
pub use exit::LaunchExit;
pub use profile::{resolve_config_source, LaunchProfile, CONFIG_PATH_ENV};

/// What a successful launch produced.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// `--dry-run`: nothing was executed.
    Planned(LaunchPlan),
    /// The program exited zero.
    Completed { output_dir: PathBuf },
}

/// Execute the launch described by `profile` and return a user-facing payload, if any.
pub async fn execute_launch(profile: LaunchProfile) -> Result<Option<String>> {
    let request = profile.job.validate().map_err(LaunchError::from)?;
    let config = LauncherConfig::load(&profile.config_source)?;
    let context = LaunchContext::from_process()?;

    match launch(request, &config, &context, profile.dry_run, &SystemRunner).await? {
        LaunchOutcome::Planned(plan) => Ok(Some(serde_json::to_string_pretty(&plan)?)),
        LaunchOutcome::Completed { .. } => Ok(None),
    }
}

/// Plan a validated request and, unless `dry_run`, execute it with `runner`.
pub async fn launch<R: StepRunner>(
    request: JobRequest,
    config: &LauncherConfig,
    context: &LaunchContext,
    dry_run: bool,
    runner: &R,
) -> Result<LaunchOutcome, LaunchError> {
    let span = RunSpan::start(
        Uuid::new_v4(),
        request.platform.as_str(),
        request.mode.as_str(),
        &request.description,
    );

    let result: Result<LaunchOutcome, LaunchError> = async {
        let plan = plan_job(request, config, context)?;
        telemetry::emit_launch(&LaunchTelemetry {
            config_path: config
                .source_path
                .as_deref()
                .and_then(|path| path.to_str()),
            output_dir: &plan.output_dir.to_string_lossy(),
            modules: &plan.environment.modules,
            program_args: &plan.program_step.args,
            dry_run,
        });

        if dry_run {
            return Ok(LaunchOutcome::Planned(plan));
        }

        execute_plan(&plan, runner).await?;
        info!(
            target: "fold_launcher::run",
            output_dir = %plan.output_dir.display(),
            "Prediction finished"
        );
        Ok::<_, LaunchError>(LaunchOutcome::Completed {
            output_dir: plan.output_dir,
        })
    }
    .instrument(span.span().clone())
    .await;

    match &result {
        Ok(LaunchOutcome::Planned(_)) => span.finish("planned", None),
        Ok(LaunchOutcome::Completed { .. }) => span.finish("succeeded", Some(0)),
        Err(err) => span.finish(err.kind(), err.exit_code()),
    }
    result
}
