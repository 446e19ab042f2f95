use std::{env, ffi::OsString, io, path::PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::{
    config::LauncherConfig,
    lib::{
        errors::LaunchError,
        paths,
        process::{self, CommandStep, StepRunner},
    },
};

use super::{
    environment::{resolve_environment, HostEnvironment, ResolvedEnvironment},
    invocation::{build_program_args, derive_output_dir, prepare_output_dir, OutputLocation},
    request::JobRequest,
};

/// Label of the prediction program step.
pub const PROGRAM_STEP_LABEL: &str = "alphafold";

/// Host facts captured once at launch.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub working_dir: PathBuf,
    pub hostname: String,
    pub started_at: NaiveDateTime,
    pub host: HostEnvironment,
}

impl LaunchContext {
    /// Capture cwd, hostname, local time, and the conda variables of this process.
    pub fn from_process() -> Result<Self, LaunchError> {
        let working_dir = env::current_dir().map_err(|err| LaunchError::Host {
            message: format!("failed to obtain current directory: {err}"),
        })?;
        let hostname = paths::hostname().map_err(|err| LaunchError::Host {
            message: format!("failed to read hostname: {err}"),
        })?;
        Ok(Self {
            working_dir,
            hostname,
            started_at: Local::now().naive_local(),
            host: HostEnvironment::from_process(),
        })
    }
}

/// Everything needed to run a job, resolved without side effects.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchPlan {
    pub request: JobRequest,
    pub environment: ResolvedEnvironment,
    pub module_steps: Vec<CommandStep>,
    pub output_dir: PathBuf,
    pub program_step: CommandStep,
}

/// Resolve a validated request into a plan.
pub fn plan_job(
    request: JobRequest,
    config: &LauncherConfig,
    context: &LaunchContext,
) -> Result<LaunchPlan, LaunchError> {
    let environment = resolve_environment(
        request.platform,
        request.mode,
        &context.host,
        &config.modules,
        &config.devices.rocm_path,
    )?;

    let module_steps = environment
        .modules
        .iter()
        .map(|module| {
            step_from_prefix(
                format!("module:{module}"),
                &config.modules.load_command,
                vec![OsString::from(module)],
                &environment,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let output_dir = derive_output_dir(
        &OutputLocation {
            working_dir: &context.working_dir,
            output_root: &config.output.root,
            hostname: &context.hostname,
            active_env: &environment.active_env,
            started_at: context.started_at,
        },
        &request.input_path,
    );

    let program_args = build_program_args(&request, &output_dir, &config.program);
    let program_step = step_from_prefix(
        PROGRAM_STEP_LABEL.to_string(),
        &config.program.command,
        program_args,
        &environment,
    )?;

    Ok(LaunchPlan {
        request,
        environment,
        module_steps,
        output_dir,
        program_step,
    })
}

/// Load modules, create the output directory, then run the program.
pub async fn execute_plan<R: StepRunner>(
    plan: &LaunchPlan,
    runner: &R,
) -> Result<(), LaunchError> {
    process::run_steps(runner, &plan.module_steps).await?;
    info!(
        target: "fold_launcher::run",
        modules = plan.module_steps.len(),
        "Cluster modules loaded"
    );
    prepare_output_dir(&plan.output_dir)?;
    process::run_step(runner, &plan.program_step).await
}

fn step_from_prefix(
    label: String,
    prefix: &[String],
    trailing: Vec<OsString>,
    environment: &ResolvedEnvironment,
) -> Result<CommandStep, LaunchError> {
    CommandStep::from_prefix(label.clone(), prefix, trailing, &environment.vars).ok_or_else(|| {
        LaunchError::ProcessSpawn {
            step: label,
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "command is empty"),
        }
    })
}
