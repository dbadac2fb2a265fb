use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::DomainError;

/// A filesystem path guaranteed to stay inside the directory it is joined to.
///
/// Invariant: never absolute, never contains `..`. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        check(&path)?;
        Ok(Self(path))
    }

    /// Join a segment, maintaining the invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        let segment = segment.as_ref();
        check(segment)?;
        Ok(Self(self.0.join(segment)))
    }

    /// Resolve against a root directory.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

fn check(path: &Path) -> Result<(), DomainError> {
    if path.is_absolute() || path.has_root() {
        return Err(DomainError::AbsolutePathNotAllowed {
            path: path.display().to_string(),
        });
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(DomainError::PathEscapesRoot {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
