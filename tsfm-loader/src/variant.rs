use crate::error::{BoxError, LoadError, ResolveError};
use crate::guard::{Predictor, PredictorGuard};
use crate::probe::{resolve_source, SourceProbe};
use crate::types::{ModelFamily, ModelReference, SourceKind};
use std::num::NonZeroU32;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared load contract implemented once per model family.
///
/// Implementors describe *what* to call for a resolved source; the provided
/// methods own probing, failure translation and scoping.
pub trait ModelVariant {
    /// The model object produced by the external library
    type Predictor: Predictor;
    /// Description of the external call(s) for one load attempt
    type Plan: std::fmt::Debug;
    /// Probe used to classify the repo id
    type Probe: SourceProbe;

    fn family(&self) -> ModelFamily;

    fn reference(&self) -> &ModelReference;

    fn probe(&self) -> &Self::Probe;

    /// Map a resolved source onto the variant's parameter names and artifact
    /// convention. Pure: no filesystem or library access.
    fn plan(&self, source: &SourceKind, prediction_length: NonZeroU32) -> Self::Plan;

    /// Execute a plan against the external library.
    ///
    /// Implementations wrap the model in a [`PredictorGuard`] as soon as it
    /// exists, so that a failure in a later step still releases it.
    fn construct(&self, plan: &Self::Plan) -> Result<PredictorGuard<Self::Predictor>, BoxError>;

    /// Resolve, plan and construct without translating failures
    fn resolve_and_load(
        &self,
        prediction_length: u32,
    ) -> Result<PredictorGuard<Self::Predictor>, BoxError> {
        let prediction_length =
            NonZeroU32::new(prediction_length).ok_or(ResolveError::ZeroPredictionLength)?;
        let source = resolve_source(self.probe(), self.reference().repo_id())?;
        let plan = self.plan(&source, prediction_length);
        debug!("Load plan for {}: {:?}", self.reference().alias(), plan);
        self.construct(&plan)
    }

    /// Acquire a fresh predictor for `prediction_length` steps.
    ///
    /// Any failure comes back as a single [`LoadError`]; nothing partially
    /// built escapes.
    fn get_predictor(
        &self,
        prediction_length: u32,
    ) -> Result<PredictorGuard<Self::Predictor>, LoadError> {
        let reference = self.reference();
        info!(
            "Loading {} model '{}' from {} (horizon {})",
            self.family(),
            reference.alias(),
            reference.repo_id(),
            prediction_length
        );

        let start_time = Instant::now();
        match self.resolve_and_load(prediction_length) {
            Ok(guard) => {
                info!(
                    "Model '{}' loaded in {:?}",
                    reference.alias(),
                    start_time.elapsed()
                );
                Ok(guard)
            }
            Err(e) => {
                warn!("Failed to load model from {}: {}", reference.repo_id(), e);
                Err(LoadError::new(reference.repo_id(), self.family(), e))
            }
        }
    }

    /// Run `f` with a freshly acquired predictor, releasing it afterwards
    fn with_predictor<F, R>(&self, prediction_length: u32, f: F) -> Result<R, LoadError>
    where
        F: FnOnce(&mut Self::Predictor) -> R,
        Self: Sized,
    {
        let mut guard = self.get_predictor(prediction_length)?;
        Ok(f(&mut guard))
    }
}
