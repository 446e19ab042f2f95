//! Output directory derivation and program argument assembly.

use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use tracing::info;

use crate::{
    config::ProgramSection,
    lib::{errors::LaunchError, paths::base_name_without_extension},
};

use super::request::{JobRequest, ModelPreset};

/// `strftime` pattern for the run directory timestamp (`1018-142503`).
pub const RUN_TIMESTAMP_FORMAT: &str = "%m%d-%H%M%S";

/// Inputs that name a run directory.
#[derive(Debug, Clone)]
pub struct OutputLocation<'a> {
    pub working_dir: &'a Path,
    pub output_root: &'a Path,
    pub hostname: &'a str,
    pub active_env: &'a OsStr,
    pub started_at: NaiveDateTime,
}

/// `{cwd}/{root}/{hostname}-{env}-{MMDD-HHMMSS}/{input stem}`.
pub fn derive_output_dir(location: &OutputLocation<'_>, input_path: &Path) -> PathBuf {
    let mut run_dir = OsString::from(location.hostname);
    run_dir.push("-");
    run_dir.push(location.active_env);
    run_dir.push("-");
    run_dir.push(location.started_at.format(RUN_TIMESTAMP_FORMAT).to_string());
    location
        .working_dir
        .join(location.output_root)
        .join(run_dir)
        .join(base_name_without_extension(input_path))
}

/// Create the output directory and its parents; an existing directory is fine.
pub fn prepare_output_dir(path: &Path) -> Result<(), LaunchError> {
    fs::create_dir_all(path).map_err(|source| LaunchError::OutputDir {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        target: "fold_launcher::output",
        path = %path.display(),
        "Output directory ready"
    );
    Ok(())
}

/// Flags passed to the prediction program, common flags first.
///
/// Path values are passed through byte for byte.
pub fn build_program_args(
    request: &JobRequest,
    output_dir: &Path,
    program: &ProgramSection,
) -> Vec<OsString> {
    let use_precomputed = request.msa_mode.use_precomputed().to_string();
    let mut args = vec![
        flag("fasta_paths", request.input_path.as_os_str()),
        flag("output_dir", output_dir.as_os_str()),
        flag("max_template_date", OsStr::new(&program.max_template_date)),
        flag("use_precomputed_msas", OsStr::new(&use_precomputed)),
        flag("model_preset", OsStr::new(request.preset.as_str())),
        flag("db_preset", OsStr::new(&program.db_preset)),
    ];

    match request.preset {
        ModelPreset::Monomer => args.push(flag(
            "uniref90_database_path",
            program.uniref90_database_path.as_os_str(),
        )),
        ModelPreset::Multimer => args.push(flag(
            "uniprot_database_path",
            program.uniprot_database_path.as_os_str(),
        )),
    }

    args
}

fn flag(name: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(format!("--{name}="));
    arg.push(value);
    arg
}
