//! External command descriptors and the sequential step runner.

use std::{collections::BTreeMap, ffi::OsString, future::Future, io, process::Stdio};

use serde::Serialize;
use tokio::process::Command;
use tracing::{error, info};

use crate::lib::{errors::LaunchError, paths};

/// One external command to execute as part of a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandStep {
    /// Label reported when the step fails (`module:hmmer-3.4`, `alphafold`).
    pub label: String,
    pub program: String,
    #[serde(serialize_with = "paths::serialize_lossy_seq")]
    pub args: Vec<OsString>,
    /// Variables applied on top of the inherited environment.
    #[serde(serialize_with = "paths::serialize_lossy_map")]
    pub env: BTreeMap<String, OsString>,
}

impl CommandStep {
    /// Build a step from a command prefix (`["ml", "load"]`) and trailing args.
    ///
    /// Returns `None` if the prefix is empty.
    pub fn from_prefix(
        label: impl Into<String>,
        prefix: &[String],
        trailing: impl IntoIterator<Item = OsString>,
        env: &BTreeMap<String, OsString>,
    ) -> Option<Self> {
        let (program, leading) = prefix.split_first()?;
        let mut args: Vec<OsString> = leading.iter().map(OsString::from).collect();
        args.extend(trailing);
        Some(Self {
            label: label.into(),
            program: program.clone(),
            args,
            env: env.clone(),
        })
    }

    /// Render the command line for logs.
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a finished step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
}

/// Abstraction over process execution so the sequence can be exercised without a cluster.
pub trait StepRunner {
    fn run(&self, step: &CommandStep) -> impl Future<Output = io::Result<StepOutcome>>;
}

/// Runner that spawns real child processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl StepRunner for SystemRunner {
    async fn run(&self, step: &CommandStep) -> io::Result<StepOutcome> {
        let status = build_command(step).status().await?;
        Ok(StepOutcome {
            success: status.success(),
            exit_code: status.code(),
        })
    }
}

/// Build a `tokio` command for a step.
pub fn build_command(step: &CommandStep) -> Command {
    let mut command = Command::new(&step.program);
    command.args(&step.args);
    command.envs(&step.env);
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());
    command
}

/// Run steps strictly in order, stopping at the first one that fails.
pub async fn run_steps<R: StepRunner>(
    runner: &R,
    steps: &[CommandStep],
) -> Result<(), LaunchError> {
    for step in steps {
        run_step(runner, step).await?;
    }
    Ok(())
}

/// Run a single step and map failures to [`LaunchError`].
pub async fn run_step<R: StepRunner>(runner: &R, step: &CommandStep) -> Result<(), LaunchError> {
    info!(
        target: "fold_launcher::process",
        step = %step.label,
        command = %step.display_line(),
        "Starting step"
    );

    let outcome = runner.run(step).await.map_err(|source| {
        error!(
            target: "fold_launcher::process",
            step = %step.label,
            program = %step.program,
            reason = %source,
            "Failed to spawn step"
        );
        LaunchError::ProcessSpawn {
            step: step.label.clone(),
            program: step.program.clone(),
            source,
        }
    })?;

    if !outcome.success {
        error!(
            target: "fold_launcher::process",
            step = %step.label,
            exit_code = outcome.exit_code,
            "Step exited abnormally"
        );
        return Err(LaunchError::ProcessFailed {
            step: step.label.clone(),
            exit_code: outcome.exit_code,
        });
    }

    info!(
        target: "fold_launcher::process",
        step = %step.label,
        "Step finished"
    );
    Ok(())
}
