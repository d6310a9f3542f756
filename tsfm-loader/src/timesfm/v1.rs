//! TimesFM 1.0 / 2.0: the checkpoint location and hyperparameters go to a
//! single constructor call.

use crate::error::BoxError;
use crate::guard::{Predictor, PredictorGuard};
use crate::probe::{FsProbe, SourceProbe};
use crate::types::{Device, ModelFamily, ModelReference, SourceKind};
use crate::variant::ModelVariant;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Checkpoint parameter used for a local directory
pub const LOCAL_PARAMETER: &str = "path";
/// Checkpoint parameter used for a hub repository id
pub const REMOTE_PARAMETER: &str = "huggingface_repo_id";

/// Where the constructor should read the checkpoint from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TimesFmV1Checkpoint {
    /// The local model directory, passed as-is
    #[serde(rename = "path")]
    Path(PathBuf),
    #[serde(rename = "huggingface_repo_id")]
    HuggingFaceRepoId(String),
}

impl TimesFmV1Checkpoint {
    pub fn from_source(source: &SourceKind) -> Self {
        match source {
            SourceKind::Local(path) => TimesFmV1Checkpoint::Path(path.clone()),
            SourceKind::Remote(repo_id) => TimesFmV1Checkpoint::HuggingFaceRepoId(repo_id.clone()),
        }
    }

    pub fn parameter_name(&self) -> &'static str {
        match self {
            TimesFmV1Checkpoint::Path(_) => LOCAL_PARAMETER,
            TimesFmV1Checkpoint::HuggingFaceRepoId(_) => REMOTE_PARAMETER,
        }
    }

    fn value(&self) -> String {
        match self {
            TimesFmV1Checkpoint::Path(path) => path.display().to_string(),
            TimesFmV1Checkpoint::HuggingFaceRepoId(repo_id) => repo_id.clone(),
        }
    }
}

/// Fixed construction parameters for the 1.x/2.0 constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimesFmV1Hparams {
    pub backend: Device,
    pub horizon_len: u32,
    pub context_len: u32,
    pub per_core_batch_size: u32,
    pub num_layers: u32,
    pub use_positional_embedding: bool,
}

impl TimesFmV1Hparams {
    pub fn for_reference(
        reference: &ModelReference,
        device: Device,
        prediction_length: NonZeroU32,
    ) -> Self {
        // 2.0 checkpoints are deeper and drop positional embeddings
        let is_v2_0 = reference.repo_id().contains("2.0");
        Self {
            backend: device,
            horizon_len: prediction_length.get(),
            context_len: reference.context_length(),
            per_core_batch_size: reference.batch_size(),
            num_layers: if is_v2_0 { 50 } else { 20 },
            use_positional_embedding: !is_v2_0,
        }
    }
}

/// The single constructor call a TimesFM 1.x/2.0 load makes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimesFmV1Plan {
    pub hparams: TimesFmV1Hparams,
    pub checkpoint: TimesFmV1Checkpoint,
}

impl TimesFmV1Plan {
    pub fn new(
        reference: &ModelReference,
        device: Device,
        source: &SourceKind,
        prediction_length: NonZeroU32,
    ) -> Self {
        Self {
            hparams: TimesFmV1Hparams::for_reference(reference, device, prediction_length),
            checkpoint: TimesFmV1Checkpoint::from_source(source),
        }
    }
}

impl fmt::Display for TimesFmV1Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.hparams;
        writeln!(f, "construct")?;
        writeln!(
            f,
            "  checkpoint.{} = {}",
            self.checkpoint.parameter_name(),
            self.checkpoint.value()
        )?;
        writeln!(f, "  hparams.backend = {}", h.backend)?;
        writeln!(f, "  hparams.horizon_len = {}", h.horizon_len)?;
        writeln!(f, "  hparams.context_len = {}", h.context_len)?;
        writeln!(f, "  hparams.per_core_batch_size = {}", h.per_core_batch_size)?;
        writeln!(f, "  hparams.num_layers = {}", h.num_layers)?;
        write!(
            f,
            "  hparams.use_positional_embedding = {}",
            h.use_positional_embedding
        )
    }
}

/// The external TimesFM 1.x/2.0 package
pub trait TimesFmV1Library {
    type Model: Predictor;

    fn construct(
        &self,
        hparams: &TimesFmV1Hparams,
        checkpoint: &TimesFmV1Checkpoint,
    ) -> Result<Self::Model, BoxError>;
}

/// Model variant for TimesFM 1.0 and 2.0 checkpoints
pub struct TimesFmV1<L, P = FsProbe> {
    reference: ModelReference,
    library: L,
    probe: P,
    device: Device,
}

impl<L: TimesFmV1Library> TimesFmV1<L, FsProbe> {
    pub fn new(reference: ModelReference, library: L) -> Self {
        Self {
            reference,
            library,
            probe: FsProbe,
            device: Device::default(),
        }
    }
}

impl<L, P> TimesFmV1<L, P> {
    /// Replace the filesystem probe
    pub fn with_probe<Q: SourceProbe>(self, probe: Q) -> TimesFmV1<L, Q> {
        TimesFmV1 {
            reference: self.reference,
            library: self.library,
            probe,
            device: self.device,
        }
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}

impl<L: TimesFmV1Library, P: SourceProbe> ModelVariant for TimesFmV1<L, P> {
    type Predictor = L::Model;
    type Plan = TimesFmV1Plan;
    type Probe = P;

    fn family(&self) -> ModelFamily {
        ModelFamily::TimesFmV1
    }

    fn reference(&self) -> &ModelReference {
        &self.reference
    }

    fn probe(&self) -> &P {
        &self.probe
    }

    fn plan(&self, source: &SourceKind, prediction_length: NonZeroU32) -> TimesFmV1Plan {
        TimesFmV1Plan::new(&self.reference, self.device, source, prediction_length)
    }

    fn construct(&self, plan: &TimesFmV1Plan) -> Result<PredictorGuard<L::Model>, BoxError> {
        let model = self.library.construct(&plan.hparams, &plan.checkpoint)?;
        Ok(PredictorGuard::new(model, self.reference.alias()))
    }
}
