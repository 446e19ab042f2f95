use std::{fmt, path::PathBuf, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// Accelerator layout requested for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExecutionMode {
    #[serde(rename = "cpu")]
    Cpu,
    #[serde(rename = "1gpu0")]
    FirstGpu,
    #[serde(rename = "1gpu1")]
    SecondGpu,
    #[serde(rename = "2gpus")]
    BothGpus,
}

impl ExecutionMode {
    pub const ALL: [ExecutionMode; 4] = [
        ExecutionMode::Cpu,
        ExecutionMode::FirstGpu,
        ExecutionMode::SecondGpu,
        ExecutionMode::BothGpus,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Cpu => "cpu",
            ExecutionMode::FirstGpu => "1gpu0",
            ExecutionMode::SecondGpu => "1gpu1",
            ExecutionMode::BothGpus => "2gpus",
        }
    }

    pub const fn uses_gpu(&self) -> bool {
        !matches!(self, ExecutionMode::Cpu)
    }
}

/// Model preset passed through to the prediction program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreset {
    Monomer,
    Multimer,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 2] = [ModelPreset::Monomer, ModelPreset::Multimer];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ModelPreset::Monomer => "monomer",
            ModelPreset::Multimer => "multimer",
        }
    }
}

/// Accelerator vendor of the target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amd,
    Nvidia,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Amd, Platform::Nvidia];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Platform::Amd => "amd",
            Platform::Nvidia => "nvidia",
        }
    }
}

/// Whether precomputed alignments are reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MsaMode {
    Msa,
    NoMsa,
}

impl MsaMode {
    pub const ALL: [MsaMode; 2] = [MsaMode::Msa, MsaMode::NoMsa];

    pub const fn as_str(&self) -> &'static str {
        match self {
            MsaMode::Msa => "msa",
            MsaMode::NoMsa => "nomsa",
        }
    }

    pub const fn use_precomputed(&self) -> bool {
        matches!(self, MsaMode::Msa)
    }
}

impl FromStr for ExecutionMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidMode {
                value: value.to_string(),
            })
    }
}

impl FromStr for ModelPreset {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidPreset {
                value: value.to_string(),
            })
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidPlatform {
                value: value.to_string(),
            })
    }
}

impl FromStr for MsaMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|msa| msa.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidMsa {
                value: value.to_string(),
            })
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(ExecutionMode, ModelPreset, Platform, MsaMode);

/// Unvalidated job input exactly as it arrived on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJobRequest {
    pub input_fasta: PathBuf,
    pub description: String,
    pub mode: String,
    pub preset: String,
    pub platform: String,
    pub msa: String,
}

/// Validated, immutable job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRequest {
    pub input_path: PathBuf,
    pub description: String,
    pub mode: ExecutionMode,
    pub preset: ModelPreset,
    pub platform: Platform,
    pub msa_mode: MsaMode,
}

impl RawJobRequest {
    /// Validate the input and report the first violation.
    ///
    /// Order: input file, preset, msa, platform, mode.
    pub fn validate(&self) -> Result<JobRequest, ValidationError> {
        if !self.input_fasta.is_file() {
            return Err(ValidationError::InputNotFound {
                path: self.input_fasta.clone(),
            });
        }
        let preset = self.preset.parse::<ModelPreset>()?;
        let msa_mode = self.msa.parse::<MsaMode>()?;
        let platform = self.platform.parse::<Platform>()?;
        let mode = self.mode.parse::<ExecutionMode>()?;

        Ok(JobRequest {
            input_path: self.input_fasta.clone(),
            description: self.description.clone(),
            mode,
            preset,
            platform,
            msa_mode,
        })
    }
}

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Input file '{}' does not exist.", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("The 'preset' argument must be 'monomer' or 'multimer'.")]
    InvalidPreset { value: String },
    #[error("The 'msa' argument must be 'msa' or 'nomsa'.")]
    InvalidMsa { value: String },
    #[error("Supported platforms are 'amd' and 'nvidia'.")]
    InvalidPlatform { value: String },
    #[error("Unsupported mode '{value}': expected one of cpu, 1gpu0, 1gpu1, 2gpus.")]
    InvalidMode { value: String },
}
