use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default context window for TimesFM references
pub const DEFAULT_CONTEXT_LENGTH: u32 = 2048;
/// Default batch size for TimesFM references
pub const DEFAULT_BATCH_SIZE: u32 = 64;
/// Default display name
pub const DEFAULT_ALIAS: &str = "TimesFM";

const MAX_BATCH_SIZE: u32 = 8192;

/// Identifies a model instance to load.
///
/// Immutable once built: every constructor validates, including
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawModelReference")]
pub struct ModelReference {
    repo_id: String,
    context_length: u32,
    batch_size: u32,
    alias: String,
}

#[derive(Deserialize)]
struct RawModelReference {
    repo_id: String,
    #[serde(default = "default_context_length")]
    context_length: u32,
    #[serde(default = "default_batch_size")]
    batch_size: u32,
    #[serde(default = "default_alias")]
    alias: String,
}

fn default_context_length() -> u32 {
    DEFAULT_CONTEXT_LENGTH
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

fn default_alias() -> String {
    DEFAULT_ALIAS.to_string()
}

impl TryFrom<RawModelReference> for ModelReference {
    type Error = ConfigError;

    fn try_from(raw: RawModelReference) -> Result<Self, Self::Error> {
        ModelReference::new(raw.repo_id, raw.context_length, raw.batch_size, raw.alias)
    }
}

impl ModelReference {
    /// Build a validated reference
    pub fn new(
        repo_id: impl Into<String>,
        context_length: u32,
        batch_size: u32,
        alias: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let reference = Self {
            repo_id: repo_id.into(),
            context_length,
            batch_size,
            alias: alias.into(),
        };
        reference.validate()?;
        Ok(reference)
    }

    /// Default reference for a model family
    pub fn default_for(family: ModelFamily) -> Self {
        Self {
            repo_id: family.default_repo_id().to_string(),
            context_length: DEFAULT_CONTEXT_LENGTH,
            batch_size: DEFAULT_BATCH_SIZE,
            alias: DEFAULT_ALIAS.to_string(),
        }
    }

    /// Load a reference from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.repo_id.trim().is_empty() {
            return Err(ConfigError::invalid("repo_id cannot be empty"));
        }

        if self.context_length == 0 {
            return Err(ConfigError::invalid(
                "Context length must be greater than 0",
            ));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::invalid("Batch size must be greater than 0"));
        }

        if self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::invalid(format!(
                "Batch size should not exceed {}",
                MAX_BATCH_SIZE
            )));
        }

        Ok(())
    }

    /// Local path or hub repository id
    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    /// Maximum input window
    pub fn context_length(&self) -> u32 {
        self.context_length
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Display name, carries no meaning for loading
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The family this reference most likely belongs to
    pub fn family(&self) -> ModelFamily {
        ModelFamily::detect(&self.repo_id)
    }
}

/// Where a model's artifacts live for one load attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum SourceKind {
    /// `repo_id` exists on the local filesystem
    Local(PathBuf),
    /// `repo_id` is passed to the hub untouched
    Remote(String),
}

impl SourceKind {
    pub fn is_local(&self) -> bool {
        matches!(self, SourceKind::Local(_))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Local(path) => write!(f, "local path {}", path.display()),
            SourceKind::Remote(repo_id) => write!(f, "hub repository {}", repo_id),
        }
    }
}

/// Supported TimesFM families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    /// TimesFM 1.0 and 2.0 checkpoints, single-step construction
    #[serde(rename = "timesfm-1")]
    TimesFmV1,
    /// TimesFM 2.5 checkpoints, shell construction then checkpoint load
    #[serde(rename = "timesfm-2.5")]
    TimesFmV2p5,
}

impl ModelFamily {
    /// Pick a family from a repo id or local directory name
    pub fn detect(repo_id: &str) -> Self {
        let lower = repo_id.to_lowercase();
        if lower.contains("2.5") || lower.contains("2p5") {
            ModelFamily::TimesFmV2p5
        } else {
            ModelFamily::TimesFmV1
        }
    }

    pub fn default_repo_id(&self) -> &'static str {
        match self {
            ModelFamily::TimesFmV1 => "google/timesfm-1.0-200m-pytorch",
            ModelFamily::TimesFmV2p5 => "google/timesfm-2.5-200m-pytorch",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::TimesFmV1 => "timesfm-1",
            ModelFamily::TimesFmV2p5 => "timesfm-2.5",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" | "1" | "timesfm-1" | "timesfm-1.0" | "timesfm-2.0" => Ok(ModelFamily::TimesFmV1),
            "v2.5" | "v2p5" | "2.5" | "timesfm-2.5" => Ok(ModelFamily::TimesFmV2p5),
            _ => Err(ConfigError::UnknownVariant {
                kind: "model family",
                value: s.to_string(),
                expected: "v1, timesfm-1, v2.5, v2p5, timesfm-2.5",
            }),
        }
    }
}

/// Compute backend requested from the external library
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Gpu,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Gpu => "gpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" | "cuda" => Ok(Device::Gpu),
            _ => Err(ConfigError::UnknownVariant {
                kind: "device",
                value: s.to_string(),
                expected: "cpu, gpu",
            }),
        }
    }
}
