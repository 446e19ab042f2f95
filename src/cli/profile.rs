//! LaunchProfile and config source resolution.
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{config::ConfigSource, job::RawJobRequest};

const DEFAULT_CONFIG: &str = "launcher.toml";
pub const CONFIG_PATH_ENV: &str = "FOLD_LAUNCHER_CONFIG";

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub job: RawJobRequest,
    pub config_source: ConfigSource,
    pub dry_run: bool,
}

/// Resolve the config source in the order: CLI override → env var → `./launcher.toml` → defaults.
pub fn resolve_config_source(override_path: Option<PathBuf>) -> Result<ConfigSource> {
    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(resolve_config_source_from(
        override_path,
        env::var_os(CONFIG_PATH_ENV),
        &cwd,
    ))
}

/// Resolve the config source from explicit values (testable helper).
fn resolve_config_source_from(
    override_path: Option<PathBuf>,
    env_path: Option<OsString>,
    cwd: &Path,
) -> ConfigSource {
    let explicit = override_path.or_else(|| {
        env_path
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });

    if let Some(path) = explicit {
        return ConfigSource::File(absolutize(path, cwd));
    }

    let default_path = cwd.join(DEFAULT_CONFIG);
    if default_path.is_file() {
        return ConfigSource::File(default_path);
    }
    ConfigSource::Defaults
}

fn absolutize(path: PathBuf, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
