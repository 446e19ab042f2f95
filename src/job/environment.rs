//! Platform/mode resolution into a child-process environment overlay.

use std::{
    collections::BTreeMap,
    env,
    ffi::{OsStr, OsString},
    path::Path,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    config::ModulesSection,
    lib::{errors::LaunchError, paths},
};

use super::request::{ExecutionMode, Platform};

pub const CONDA_PREFIX_ENV: &str = "CONDA_PREFIX";
pub const CONDA_DEFAULT_ENV_ENV: &str = "CONDA_DEFAULT_ENV";
pub const LD_LIBRARY_PATH_ENV: &str = "LD_LIBRARY_PATH";
pub const JAX_PLATFORMS_ENV: &str = "JAX_PLATFORMS";
pub const ROCM_PATH_ENV: &str = "ROCM_PATH";
pub const HIP_VISIBLE_DEVICES_ENV: &str = "HIP_VISIBLE_DEVICES";
pub const CUDA_VISIBLE_DEVICES_ENV: &str = "CUDA_VISIBLE_DEVICES";

/// The subset of the launcher's own environment that resolution reads.
///
/// Values are kept as raw OS strings so nothing is lost on the way to the child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    pub conda_prefix: Option<OsString>,
    pub conda_default_env: Option<OsString>,
    pub ld_library_path: Option<OsString>,
}

impl HostEnvironment {
    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self {
            conda_prefix: env::var_os(CONDA_PREFIX_ENV),
            conda_default_env: env::var_os(CONDA_DEFAULT_ENV_ENV),
            ld_library_path: env::var_os(LD_LIBRARY_PATH_ENV),
        }
    }

    /// Environment with an active conda env, as a cluster login shell provides.
    pub fn with_conda(prefix: impl Into<OsString>, name: impl Into<OsString>) -> Self {
        Self {
            conda_prefix: Some(prefix.into()),
            conda_default_env: Some(name.into()),
            ld_library_path: None,
        }
    }
}

/// One row of the device table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAssignment {
    pub jax_platforms: &'static str,
    pub visibility_var: &'static str,
    pub visible_devices: &'static str,
    /// Whether `ROCM_PATH` must be exported.
    pub needs_rocm_path: bool,
}

/// Device table keyed by platform and mode.
pub const fn device_assignment(platform: Platform, mode: ExecutionMode) -> DeviceAssignment {
    let visible_devices = match mode {
        ExecutionMode::Cpu => "-1",
        ExecutionMode::FirstGpu => "0",
        ExecutionMode::SecondGpu => "1",
        ExecutionMode::BothGpus => "0,1",
    };
    match platform {
        Platform::Amd => DeviceAssignment {
            jax_platforms: if mode.uses_gpu() { "rocm" } else { "cpu" },
            visibility_var: HIP_VISIBLE_DEVICES_ENV,
            visible_devices,
            needs_rocm_path: mode.uses_gpu(),
        },
        Platform::Nvidia => DeviceAssignment {
            jax_platforms: if mode.uses_gpu() { "cuda" } else { "cpu" },
            visibility_var: CUDA_VISIBLE_DEVICES_ENV,
            visible_devices,
            needs_rocm_path: false,
        },
    }
}

/// Resolved environment overlay and module list for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEnvironment {
    #[serde(serialize_with = "paths::serialize_lossy_map")]
    pub vars: BTreeMap<String, OsString>,
    pub modules: Vec<String>,
    /// Name of the active conda environment, used in the output directory name.
    #[serde(serialize_with = "paths::serialize_lossy")]
    pub active_env: OsString,
}

impl ResolvedEnvironment {
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(key).map(OsString::as_os_str)
    }
}

/// Resolve the child environment for `(platform, mode)`.
///
/// Fails with [`LaunchError::MissingEnvironment`] when the conda variables are absent,
/// before anything else happens.
pub fn resolve_environment(
    platform: Platform,
    mode: ExecutionMode,
    host: &HostEnvironment,
    modules: &ModulesSection,
    rocm_path: &Path,
) -> Result<ResolvedEnvironment, LaunchError> {
    let conda_prefix = host
        .conda_prefix
        .as_deref()
        .ok_or(LaunchError::MissingEnvironment {
            variable: CONDA_PREFIX_ENV,
        })?;
    let active_env = host
        .conda_default_env
        .as_deref()
        .ok_or(LaunchError::MissingEnvironment {
            variable: CONDA_DEFAULT_ENV_ENV,
        })?;

    let assignment = device_assignment(platform, mode);
    let mut vars = BTreeMap::new();
    vars.insert(
        JAX_PLATFORMS_ENV.to_string(),
        OsString::from(assignment.jax_platforms),
    );
    if assignment.needs_rocm_path {
        vars.insert(
            ROCM_PATH_ENV.to_string(),
            rocm_path.as_os_str().to_os_string(),
        );
    }
    vars.insert(
        assignment.visibility_var.to_string(),
        OsString::from(assignment.visible_devices),
    );

    let mut library_path = conda_prefix.to_os_string();
    library_path.push("/lib:");
    if let Some(existing) = &host.ld_library_path {
        library_path.push(existing);
    }
    vars.insert(LD_LIBRARY_PATH_ENV.to_string(), library_path);

    debug!(
        target: "fold_launcher::environment",
        platform = platform.as_str(),
        mode = mode.as_str(),
        vars = ?vars,
        "Resolved device environment"
    );

    Ok(ResolvedEnvironment {
        vars,
        modules: modules.for_platform(platform).to_vec(),
        active_env: active_env.to_os_string(),
    })
}
