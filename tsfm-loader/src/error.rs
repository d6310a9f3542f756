use crate::types::ModelFamily;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by external model libraries
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single error surfaced by predictor acquisition.
///
/// Whatever went wrong while probing the source, constructing the model or
/// loading its checkpoint is attached as [`std::error::Error::source`]. Callers
/// cannot distinguish causes structurally at this layer.
#[derive(Debug, Error)]
#[error("Failed to load model\n🔧 Verify the local checkpoint directory or hub repository id; the error source holds the underlying cause")]
pub struct LoadError {
    repo_id: String,
    family: ModelFamily,
    #[source]
    source: BoxError,
}

impl LoadError {
    /// Wrap an underlying failure for the given model
    pub fn new(repo_id: impl Into<String>, family: ModelFamily, source: impl Into<BoxError>) -> Self {
        Self {
            repo_id: repo_id.into(),
            family,
            source: source.into(),
        }
    }

    /// The repo id of the reference that failed to load
    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    /// The model family whose load failed
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// The original failure, for diagnostics only
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// Failures raised by the facade itself before the external library is called
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The requested horizon was zero
    #[error("Prediction length must be greater than 0")]
    ZeroPredictionLength,

    /// The local existence probe could not be evaluated
    #[error("Failed to probe local path {}: {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while building a model reference or reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid model reference
    #[error("Invalid model config: {0}\n⚙️ Ensure repo_id is not empty, context_length > 0 and 0 < batch_size <= 8192")]
    InvalidConfig(String),

    /// Unknown model family or device name
    #[error("Unknown {kind}: '{value}'\n💡 Expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// I/O error while reading a configuration file
    #[error("I/O error: {0}\n💾 Check that the configuration file exists and is readable")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration
    #[error("JSON error: {0}\n📄 Check the configuration file syntax")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create a new invalid-config error from a message
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
