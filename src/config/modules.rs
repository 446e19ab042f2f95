use std::path::Path;

use serde::Deserialize;

use crate::{job::request::Platform, lib::errors::ConfigError};

use super::program::validate_command;

pub const DEFAULT_MODULE_LOAD_COMMAND: &[&str] = &["ml", "load"];
pub const DEFAULT_AMD_MODULES: &[&str] = &["hmmer-3.4", "hh-suite-3.3_AVX2", "kalign-3.4.0"];
pub const DEFAULT_NVIDIA_MODULES: &[&str] =
    &["hmmer-3.4-a100", "hh-suite-3.3_AVX2", "kalign-3.4.0-a100"];

/// Cluster modules loaded before the prediction program runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulesSection {
    pub load_command: Vec<String>,
    pub amd: Vec<String>,
    pub nvidia: Vec<String>,
}

impl ModulesSection {
    /// Ordered module list for a platform.
    pub fn for_platform(&self, platform: Platform) -> &[String] {
        match platform {
            Platform::Amd => &self.amd,
            Platform::Nvidia => &self.nvidia,
        }
    }
}

impl Default for ModulesSection {
    fn default() -> Self {
        Self {
            load_command: to_owned(DEFAULT_MODULE_LOAD_COMMAND),
            amd: to_owned(DEFAULT_AMD_MODULES),
            nvidia: to_owned(DEFAULT_NVIDIA_MODULES),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawModulesSection {
    pub load_command: Option<Vec<String>>,
    pub amd: Option<Vec<String>>,
    pub nvidia: Option<Vec<String>>,
}

pub fn parse_modules_section(
    raw: Option<RawModulesSection>,
    path: &Path,
) -> Result<ModulesSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = ModulesSection::default();

    let load_command = raw.load_command.unwrap_or(defaults.load_command);
    validate_command(path, "modules.load_command", &load_command)?;

    let amd = raw.amd.unwrap_or(defaults.amd);
    validate_module_names(path, "modules.amd", &amd)?;

    let nvidia = raw.nvidia.unwrap_or(defaults.nvidia);
    validate_module_names(path, "modules.nvidia", &nvidia)?;

    Ok(ModulesSection {
        load_command,
        amd,
        nvidia,
    })
}

fn validate_module_names(
    path: &Path,
    field: &'static str,
    modules: &[String],
) -> Result<(), ConfigError> {
    for module in modules {
        if module.trim().is_empty() {
            return Err(ConfigError::invalid(
                path,
                field,
                "Module names cannot be empty".into(),
            ));
        }
        if module.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid(
                path,
                field,
                format!("Module names cannot contain whitespace: `{module}`"),
            ));
        }
    }
    Ok(())
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
