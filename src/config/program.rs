use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths::is_nonempty_absolute};

pub const DEFAULT_PROGRAM_COMMAND: &[&str] = &["python3", "run_alphafold.py"];
pub const DEFAULT_MAX_TEMPLATE_DATE: &str = "2022-01-01";
pub const DEFAULT_DB_PRESET: &str = "full_dbs";
pub const DEFAULT_UNIREF90_DATABASE_PATH: &str = "/data/uniref90.fasta";
pub const DEFAULT_UNIPROT_DATABASE_PATH: &str = "/data/uniprot.fasta";
pub const DEFAULT_ROCM_PATH: &str = "/opt/rocm";
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// Prediction program invocation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSection {
    pub command: Vec<String>,
    pub max_template_date: String,
    pub db_preset: String,
    pub uniref90_database_path: PathBuf,
    pub uniprot_database_path: PathBuf,
}

impl Default for ProgramSection {
    fn default() -> Self {
        Self {
            command: DEFAULT_PROGRAM_COMMAND
                .iter()
                .map(|part| part.to_string())
                .collect(),
            max_template_date: DEFAULT_MAX_TEMPLATE_DATE.to_string(),
            db_preset: DEFAULT_DB_PRESET.to_string(),
            uniref90_database_path: PathBuf::from(DEFAULT_UNIREF90_DATABASE_PATH),
            uniprot_database_path: PathBuf::from(DEFAULT_UNIPROT_DATABASE_PATH),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawProgramSection {
    pub command: Option<Vec<String>>,
    pub max_template_date: Option<String>,
    pub db_preset: Option<String>,
    pub uniref90_database_path: Option<PathBuf>,
    pub uniprot_database_path: Option<PathBuf>,
}

/// Device-related settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicesSection {
    pub rocm_path: PathBuf,
}

impl Default for DevicesSection {
    fn default() -> Self {
        Self {
            rocm_path: PathBuf::from(DEFAULT_ROCM_PATH),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawDevicesSection {
    pub rocm_path: Option<PathBuf>,
}

/// Where run directories are created, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSection {
    pub root: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawOutputSection {
    pub root: Option<PathBuf>,
}

pub fn parse_program_section(
    raw: Option<RawProgramSection>,
    path: &Path,
) -> Result<ProgramSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = ProgramSection::default();

    let command = raw.command.unwrap_or(defaults.command);
    validate_command(path, "program.command", &command)?;

    let max_template_date = raw
        .max_template_date
        .map(|value| value.trim().to_string())
        .unwrap_or(defaults.max_template_date);
    validate_template_date(path, &max_template_date)?;

    let db_preset = raw.db_preset.unwrap_or(defaults.db_preset);
    if db_preset.trim().is_empty() {
        return Err(ConfigError::invalid(
            path,
            "program.db_preset",
            "db_preset cannot be empty".into(),
        ));
    }

    let uniref90_database_path = raw
        .uniref90_database_path
        .unwrap_or(defaults.uniref90_database_path);
    validate_absolute(path, "program.uniref90_database_path", &uniref90_database_path)?;

    let uniprot_database_path = raw
        .uniprot_database_path
        .unwrap_or(defaults.uniprot_database_path);
    validate_absolute(path, "program.uniprot_database_path", &uniprot_database_path)?;

    Ok(ProgramSection {
        command,
        max_template_date,
        db_preset,
        uniref90_database_path,
        uniprot_database_path,
    })
}

pub fn parse_devices_section(
    raw: Option<RawDevicesSection>,
    path: &Path,
) -> Result<DevicesSection, ConfigError> {
    let rocm_path = raw
        .unwrap_or_default()
        .rocm_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROCM_PATH));
    validate_absolute(path, "devices.rocm_path", &rocm_path)?;
    Ok(DevicesSection { rocm_path })
}

pub fn parse_output_section(
    raw: Option<RawOutputSection>,
    path: &Path,
) -> Result<OutputSection, ConfigError> {
    let root = raw
        .unwrap_or_default()
        .root
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT));
    if root.as_os_str().is_empty() || root.is_absolute() {
        return Err(ConfigError::invalid(
            path,
            "output.root",
            "Provide a non-empty path relative to the working directory".into(),
        ));
    }
    Ok(OutputSection { root })
}

pub(crate) fn validate_command(
    path: &Path,
    field: &'static str,
    command: &[String],
) -> Result<(), ConfigError> {
    if command.is_empty() {
        return Err(ConfigError::invalid(
            path,
            field,
            "Provide at least one entry (the program to execute)".into(),
        ));
    }
    if command.iter().any(|part| part.trim().is_empty()) {
        return Err(ConfigError::invalid(
            path,
            field,
            "Command entries cannot be empty".into(),
        ));
    }
    Ok(())
}

fn validate_template_date(path: &Path, date: &str) -> Result<(), ConfigError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|err| {
            ConfigError::invalid(
                path,
                "program.max_template_date",
                format!("Expected YYYY-MM-DD, got `{date}` ({err})"),
            )
        })
}

fn validate_absolute(path: &Path, field: &'static str, value: &Path) -> Result<(), ConfigError> {
    if !is_nonempty_absolute(value) {
        return Err(ConfigError::invalid(
            path,
            field,
            format!("Only absolute paths are allowed: {}", value.display()),
        ));
    }
    Ok(())
}
