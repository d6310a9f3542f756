//! # TimesFM Loader
//!
//! Resolves TimesFM model references to a local directory or a hub
//! repository, constructs the predictor through the external TimesFM
//! package, and hands it out as a scoped [`PredictorGuard`]. Every failure on
//! the way is reported as one [`LoadError`].

pub mod error;
pub mod guard;
pub mod probe;
pub mod timesfm;
pub mod types;
pub mod variant;

// Re-export main types for convenience
pub use error::{BoxError, ConfigError, LoadError, ResolveError};
pub use guard::{Predictor, PredictorGuard, ReleaseToken};
pub use probe::{resolve_source, FsProbe, SourceProbe};
pub use timesfm::{LoadPlan, TimesFmV1, TimesFmV2p5};
pub use types::{Device, ModelFamily, ModelReference, SourceKind};
pub use variant::ModelVariant;
