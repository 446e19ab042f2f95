//! Load and validate launcher configuration.
use std::path::PathBuf;

use serde::Deserialize;
use tracing::error;

use crate::lib::errors::ConfigError;

pub mod modules;
pub mod program;
pub mod telemetry;

pub use modules::{
    parse_modules_section, ModulesSection, RawModulesSection, DEFAULT_AMD_MODULES,
    DEFAULT_MODULE_LOAD_COMMAND, DEFAULT_NVIDIA_MODULES,
};
pub use program::{
    parse_devices_section, parse_output_section, parse_program_section, DevicesSection,
    OutputSection, ProgramSection, RawDevicesSection, RawOutputSection, RawProgramSection,
    DEFAULT_DB_PRESET, DEFAULT_MAX_TEMPLATE_DATE, DEFAULT_OUTPUT_ROOT, DEFAULT_ROCM_PATH,
    DEFAULT_UNIPROT_DATABASE_PATH, DEFAULT_UNIREF90_DATABASE_PATH,
};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file: use built-in defaults.
    Defaults,
    /// Read this TOML file; it must exist.
    File(PathBuf),
}

/// Top-level configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherConfig {
    pub program: ProgramSection,
    pub modules: ModulesSection,
    pub devices: DevicesSection,
    pub output: OutputSection,
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawLauncherConfig {
    program: Option<RawProgramSection>,
    modules: Option<RawModulesSection>,
    devices: Option<RawDevicesSection>,
    output: Option<RawOutputSection>,
}

impl LauncherConfig {
    /// Load configuration from the resolved source.
    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        telemetry::log_source(source);
        let config = match source {
            ConfigSource::Defaults => Self::default(),
            ConfigSource::File(path) => Self::load_from_path(path.clone())?,
        };
        telemetry::log_loaded(&config);
        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let builder = config::Config::builder().add_source(
            config::File::from(path.clone()).format(config::FileFormat::Toml),
        );
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "fold_launcher::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawLauncherConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "fold_launcher::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "fold_launcher::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })
    }

    fn from_raw(raw: RawLauncherConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let program = parse_program_section(raw.program, &path)?;
        let modules = parse_modules_section(raw.modules, &path)?;
        let devices = parse_devices_section(raw.devices, &path)?;
        let output = parse_output_section(raw.output, &path)?;

        Ok(Self {
            program,
            modules,
            devices,
            output,
            source_path: Some(path),
        })
    }
}
