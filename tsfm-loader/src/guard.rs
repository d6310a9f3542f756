use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Proof that the caller is a [`PredictorGuard`] being dropped.
///
/// Only the guard can build one, so code holding `&mut P` cannot release a
/// predictor behind the guard's back:
///
/// ```compile_fail
/// use tsfm_loader::ReleaseToken;
/// let token = ReleaseToken { _sealed: () };
/// ```
#[derive(Debug)]
pub struct ReleaseToken {
    _sealed: (),
}

/// An inference-capable object produced by an external model library
pub trait Predictor {
    /// Free backend memory and handles held by the predictor.
    ///
    /// Called exactly once, by [`PredictorGuard`] when it goes out of scope.
    fn release(&mut self, token: ReleaseToken);
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn release(&mut self, token: ReleaseToken) {
        (**self).release(token)
    }
}

/// Scoped ownership of a live predictor.
///
/// The predictor is reachable through `Deref`/`DerefMut` while the guard is
/// alive, and released on every exit path: normal drop, early return, `?`
/// propagation or unwinding.
pub struct PredictorGuard<P: Predictor> {
    predictor: P,
    alias: String,
}

impl<P: Predictor> PredictorGuard<P> {
    /// Take ownership of a freshly constructed predictor
    pub fn new(predictor: P, alias: impl Into<String>) -> Self {
        Self {
            predictor,
            alias: alias.into(),
        }
    }

    /// Display name of the model this predictor was loaded for
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// End the scope now instead of at the end of the enclosing block
    pub fn release(self) {
        drop(self)
    }
}

impl<P: Predictor> Deref for PredictorGuard<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.predictor
    }
}

impl<P: Predictor> DerefMut for PredictorGuard<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.predictor
    }
}

impl<P: Predictor> Drop for PredictorGuard<P> {
    fn drop(&mut self) {
        debug!("Releasing predictor for {}", self.alias);
        self.predictor.release(ReleaseToken { _sealed: () });
    }
}

impl<P: Predictor + std::fmt::Debug> std::fmt::Debug for PredictorGuard<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictorGuard")
            .field("predictor", &self.predictor)
            .field("alias", &self.alias)
            .finish()
    }
}
