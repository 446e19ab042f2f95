use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

use crate::job::request::ValidationError;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }

    pub(crate) fn invalid(path: &std::path::Path, field: &'static str, message: String) -> Self {
        Self::InvalidField {
            path: path.to_path_buf(),
            field,
            message,
        }
    }
}

/// Failures raised while planning or executing a launch.
///
/// Every variant is terminal: the CLI prints the message and exits with status 1.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("Environment variables CONDA_PREFIX or CONDA_DEFAULT_ENV are missing (`{variable}` is not set)")]
    MissingEnvironment { variable: &'static str },
    #[error("Failed to start `{program}` for step `{step}`: {source}")]
    ProcessSpawn {
        step: String,
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Step `{step}` exited abnormally (exit={exit_code:?})")]
    ProcessFailed {
        step: String,
        exit_code: Option<i32>,
    },
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to inspect host: {message}")]
    Host { message: String },
}

impl LaunchError {
    /// Coarse classification used in telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchError::InvalidInput(_) => "invalid_input",
            LaunchError::MissingEnvironment { .. } => "missing_environment",
            LaunchError::ProcessSpawn { .. } | LaunchError::ProcessFailed { .. } => {
                "external_process_failure"
            }
            LaunchError::OutputDir { .. } | LaunchError::Host { .. } => "host_failure",
        }
    }

    /// Exit code of the failing child, when one ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            LaunchError::ProcessFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}
