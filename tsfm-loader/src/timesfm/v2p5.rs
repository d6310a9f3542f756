//! TimesFM 2.5: an empty model shell is created first, then weights are
//! loaded into it and it is compiled for a forecast configuration.

use crate::error::BoxError;
use crate::guard::{Predictor, PredictorGuard};
use crate::probe::{FsProbe, SourceProbe};
use crate::types::{ModelFamily, ModelReference, SourceKind};
use crate::variant::ModelVariant;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Weights file expected inside a local model directory
pub const CHECKPOINT_FILENAME: &str = "model.safetensors";
/// Checkpoint parameter used for a local weights file
pub const LOCAL_PARAMETER: &str = "path";
/// Checkpoint parameter used for a hub repository id
pub const REMOTE_PARAMETER: &str = "hf_repo_id";

/// Argument of the checkpoint-load call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TimesFmV2p5Checkpoint {
    /// `<model dir>/model.safetensors`
    #[serde(rename = "path")]
    Path(PathBuf),
    #[serde(rename = "hf_repo_id")]
    HfRepoId(String),
}

impl TimesFmV2p5Checkpoint {
    pub fn from_source(source: &SourceKind) -> Self {
        match source {
            SourceKind::Local(dir) => TimesFmV2p5Checkpoint::Path(dir.join(CHECKPOINT_FILENAME)),
            SourceKind::Remote(repo_id) => TimesFmV2p5Checkpoint::HfRepoId(repo_id.clone()),
        }
    }

    pub fn parameter_name(&self) -> &'static str {
        match self {
            TimesFmV2p5Checkpoint::Path(_) => LOCAL_PARAMETER,
            TimesFmV2p5Checkpoint::HfRepoId(_) => REMOTE_PARAMETER,
        }
    }

    fn value(&self) -> String {
        match self {
            TimesFmV2p5Checkpoint::Path(path) => path.display().to_string(),
            TimesFmV2p5Checkpoint::HfRepoId(repo_id) => repo_id.clone(),
        }
    }
}

/// Settings the 2.5 model is compiled with after its weights load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastConfig {
    pub max_context: u32,
    pub max_horizon: u32,
    pub per_core_batch_size: u32,
    pub normalize_inputs: bool,
    pub use_continuous_quantile_head: bool,
    pub force_flip_invariance: bool,
    pub infer_is_positive: bool,
    pub fix_quantile_crossing: bool,
}

impl ForecastConfig {
    pub fn for_reference(reference: &ModelReference, prediction_length: NonZeroU32) -> Self {
        Self {
            max_context: reference.context_length(),
            max_horizon: prediction_length.get(),
            per_core_batch_size: reference.batch_size(),
            normalize_inputs: true,
            use_continuous_quantile_head: true,
            force_flip_invariance: true,
            infer_is_positive: true,
            fix_quantile_crossing: true,
        }
    }
}

/// Shell creation, checkpoint load and compile for one TimesFM 2.5 load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimesFmV2p5Plan {
    pub checkpoint: TimesFmV2p5Checkpoint,
    pub forecast_config: ForecastConfig,
}

impl TimesFmV2p5Plan {
    pub fn new(
        reference: &ModelReference,
        source: &SourceKind,
        prediction_length: NonZeroU32,
    ) -> Self {
        Self {
            checkpoint: TimesFmV2p5Checkpoint::from_source(source),
            forecast_config: ForecastConfig::for_reference(reference, prediction_length),
        }
    }
}

impl fmt::Display for TimesFmV2p5Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.forecast_config;
        writeln!(f, "create")?;
        writeln!(f, "load_checkpoint")?;
        writeln!(
            f,
            "  {} = {}",
            self.checkpoint.parameter_name(),
            self.checkpoint.value()
        )?;
        writeln!(f, "compile")?;
        writeln!(f, "  max_context = {}", c.max_context)?;
        writeln!(f, "  max_horizon = {}", c.max_horizon)?;
        writeln!(f, "  per_core_batch_size = {}", c.per_core_batch_size)?;
        writeln!(f, "  normalize_inputs = {}", c.normalize_inputs)?;
        writeln!(
            f,
            "  use_continuous_quantile_head = {}",
            c.use_continuous_quantile_head
        )?;
        writeln!(f, "  force_flip_invariance = {}", c.force_flip_invariance)?;
        writeln!(f, "  infer_is_positive = {}", c.infer_is_positive)?;
        write!(f, "  fix_quantile_crossing = {}", c.fix_quantile_crossing)
    }
}

/// A TimesFM 2.5 model object as returned by the external package
pub trait TimesFmV2p5Model: Predictor {
    fn load_checkpoint(&mut self, checkpoint: &TimesFmV2p5Checkpoint) -> Result<(), BoxError>;

    fn compile(&mut self, config: &ForecastConfig) -> Result<(), BoxError>;
}

/// The external TimesFM 2.5 package
pub trait TimesFmV2p5Library {
    type Model: TimesFmV2p5Model;

    /// Build an empty model without weights
    fn create(&self) -> Result<Self::Model, BoxError>;
}

/// Model variant for TimesFM 2.5 checkpoints
pub struct TimesFmV2p5<L, P = FsProbe> {
    reference: ModelReference,
    library: L,
    probe: P,
}

impl<L: TimesFmV2p5Library> TimesFmV2p5<L, FsProbe> {
    pub fn new(reference: ModelReference, library: L) -> Self {
        Self {
            reference,
            library,
            probe: FsProbe,
        }
    }
}

impl<L, P> TimesFmV2p5<L, P> {
    /// Replace the filesystem probe
    pub fn with_probe<Q: SourceProbe>(self, probe: Q) -> TimesFmV2p5<L, Q> {
        TimesFmV2p5 {
            reference: self.reference,
            library: self.library,
            probe,
        }
    }
}

impl<L: TimesFmV2p5Library, P: SourceProbe> ModelVariant for TimesFmV2p5<L, P> {
    type Predictor = L::Model;
    type Plan = TimesFmV2p5Plan;
    type Probe = P;

    fn family(&self) -> ModelFamily {
        ModelFamily::TimesFmV2p5
    }

    fn reference(&self) -> &ModelReference {
        &self.reference
    }

    fn probe(&self) -> &P {
        &self.probe
    }

    fn plan(&self, source: &SourceKind, prediction_length: NonZeroU32) -> TimesFmV2p5Plan {
        TimesFmV2p5Plan::new(&self.reference, source, prediction_length)
    }

    fn construct(&self, plan: &TimesFmV2p5Plan) -> Result<PredictorGuard<L::Model>, BoxError> {
        // The shell is guarded before loading so a failed load still releases it
        let mut guard = PredictorGuard::new(self.library.create()?, self.reference.alias());
        guard.load_checkpoint(&plan.checkpoint)?;
        guard.compile(&plan.forecast_config)?;
        Ok(guard)
    }
}
