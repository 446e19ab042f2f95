//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::job::RawJobRequest;

use super::{resolve_config_source, LaunchProfile};

/// Command-line arguments.
///
/// Choice-valued positionals are kept as plain strings so the job validator decides
/// the order in which violations are reported.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Run AlphaFold2 with cluster-specific settings",
    long_about = None,
    after_help = "Hint: use `--dry-run` to print the resolved modules, environment, and program flags without running anything."
)]
pub struct LaunchArgs {
    /// Input FASTA file path.
    pub input_fasta: PathBuf,
    /// Job description.
    pub description: String,
    /// Execution mode: cpu, 1gpu0, 1gpu1, 2gpus.
    pub mode: String,
    /// Model preset: monomer or multimer.
    pub preset: String,
    /// Platform: amd or nvidia.
    pub platform: String,
    /// MSA setting: msa or nomsa.
    pub msa: String,
    /// Path to launcher.toml (overrides FOLD_LAUNCHER_CONFIG).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
    /// Print the resolved launch plan as JSON instead of running it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl LaunchArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn into_profile(self) -> Result<LaunchProfile> {
        let config_source = resolve_config_source(self.config_override)?;

        Ok(LaunchProfile {
            job: RawJobRequest {
                input_fasta: self.input_fasta,
                description: self.description,
                mode: self.mode,
                preset: self.preset,
                platform: self.platform,
                msa: self.msa,
            },
            config_source,
            dry_run: self.dry_run,
        })
    }
}
