use crate::error::ResolveError;
use crate::types::SourceKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local existence check used to classify a repo id
#[cfg_attr(test, mockall::automock)]
pub trait SourceProbe {
    /// Whether `path` exists on the local filesystem
    fn exists(&self, path: &Path) -> std::io::Result<bool>;
}

/// Probe backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl SourceProbe for FsProbe {
    fn exists(&self, path: &Path) -> std::io::Result<bool> {
        path.try_exists()
    }
}

/// Classify `repo_id` as Local or Remote with exactly one probe call.
///
/// Never cached: a path that appears between two attempts resolves as Local
/// on the second one.
pub fn resolve_source<P: SourceProbe + ?Sized>(
    probe: &P,
    repo_id: &str,
) -> Result<SourceKind, ResolveError> {
    let path = Path::new(repo_id);
    let exists = probe.exists(path).map_err(|source| ResolveError::Probe {
        path: PathBuf::from(repo_id),
        source,
    })?;

    let source = if exists {
        SourceKind::Local(PathBuf::from(repo_id))
    } else {
        SourceKind::Remote(repo_id.to_string())
    };
    debug!("Resolved '{}' to {}", repo_id, source);
    Ok(source)
}
