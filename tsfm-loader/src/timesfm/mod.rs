//! TimesFM model variants.

pub mod v1;
pub mod v2p5;

use crate::types::{Device, ModelFamily, ModelReference, SourceKind};
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;

pub use v1::{TimesFmV1, TimesFmV1Checkpoint, TimesFmV1Hparams, TimesFmV1Library, TimesFmV1Plan};
pub use v2p5::{
    ForecastConfig, TimesFmV2p5, TimesFmV2p5Checkpoint, TimesFmV2p5Library, TimesFmV2p5Model,
    TimesFmV2p5Plan, CHECKPOINT_FILENAME,
};

/// Load plan of either family, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "family")]
pub enum LoadPlan {
    #[serde(rename = "timesfm-1")]
    TimesFmV1(TimesFmV1Plan),
    #[serde(rename = "timesfm-2.5")]
    TimesFmV2p5(TimesFmV2p5Plan),
}

impl LoadPlan {
    /// Plan a load without a library at hand.
    ///
    /// `device` only affects the 1.x/2.0 hparams.
    pub fn for_family(
        family: ModelFamily,
        reference: &ModelReference,
        device: Device,
        source: &SourceKind,
        prediction_length: NonZeroU32,
    ) -> Self {
        match family {
            ModelFamily::TimesFmV1 => LoadPlan::TimesFmV1(TimesFmV1Plan::new(
                reference,
                device,
                source,
                prediction_length,
            )),
            ModelFamily::TimesFmV2p5 => LoadPlan::TimesFmV2p5(TimesFmV2p5Plan::new(
                reference,
                source,
                prediction_length,
            )),
        }
    }

    pub fn family(&self) -> ModelFamily {
        match self {
            LoadPlan::TimesFmV1(_) => ModelFamily::TimesFmV1,
            LoadPlan::TimesFmV2p5(_) => ModelFamily::TimesFmV2p5,
        }
    }
}

impl fmt::Display for LoadPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPlan::TimesFmV1(plan) => fmt::Display::fmt(plan, f),
            LoadPlan::TimesFmV2p5(plan) => fmt::Display::fmt(plan, f),
        }
    }
}
