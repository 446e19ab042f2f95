//! Telemetry initialization and launch run span helpers.

use std::{ffi::OsString, time::Instant};

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
///
/// Logs go to stderr; stdout is reserved for the error line and dry-run plans.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of a single launch.
pub struct RunSpan {
    span: Span,
    started_at: Instant,
    run_id: Uuid,
}

impl RunSpan {
    /// Start a run span.
    pub fn start(
        run_id: Uuid,
        platform: &'static str,
        mode: &'static str,
        description: &str,
    ) -> Self {
        let span = info_span!(
            target: "fold_launcher::run",
            "launch",
            %run_id,
            platform,
            mode,
            description
        );
        Self {
            span,
            started_at: Instant::now(),
            run_id,
        }
    }

    /// Span to instrument the launch with.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording status and completion info.
    pub fn finish(self, status: &'static str, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "fold_launcher::run",
            run_id = %self.run_id,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Completed launch"
        );
    }
}

/// Fields logged once a launch is resolved.
#[derive(Debug)]
pub struct LaunchTelemetry<'a> {
    pub config_path: Option<&'a str>,
    pub output_dir: &'a str,
    pub modules: &'a [String],
    pub program_args: &'a [OsString],
    pub dry_run: bool,
}

/// Emit the resolved launch to `tracing`.
pub fn emit_launch(telemetry: &LaunchTelemetry<'_>) {
    info!(
        target: "fold_launcher::run",
        config_path = telemetry.config_path.unwrap_or("<defaults>"),
        output_dir = telemetry.output_dir,
        modules = ?telemetry.modules,
        program_args = ?telemetry.program_args,
        dry_run = telemetry.dry_run,
        "Resolved launch plan"
    );
}
