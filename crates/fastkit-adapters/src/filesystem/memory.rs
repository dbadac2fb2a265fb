//! In-memory filesystem adapter for tests and dry runs.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use fastkit_core::{
    application::{ApplicationError, ports::Filesystem},
    error::FastkitResult,
};

/// In-memory filesystem.
///
/// Clones share the same store, so a test can keep a handle while the
/// orchestrator owns another.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    /// Paths that refuse removal, as a read-only mount would.
    protected: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    fn read(&self) -> FastkitResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> FastkitResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Make removal of `path` fail with a permission error.
    pub fn protect(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.protected.insert(path.into());
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFilesystemInner {
    fn check_removable(&self, path: &Path) -> FastkitResult<()> {
        if self.protected.iter().any(|p| p.starts_with(path) || path.starts_with(p)) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Permission denied".into(),
            }
            .into());
        }
        Ok(())
    }

    fn children(&self, path: &Path, recursive: bool) -> Vec<PathBuf> {
        let matches = |p: &Path| {
            if recursive {
                p != path && p.starts_with(path)
            } else {
                p.parent() == Some(path)
            }
        };
        let found: BTreeSet<PathBuf> = self
            .files
            .keys()
            .chain(self.directories.iter())
            .filter(|p| matches(p))
            .cloned()
            .collect();
        found.into_iter().collect()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> FastkitResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> FastkitResult<()> {
        let mut inner = self.write()?;

        // Parent must exist, as with std::fs::write
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> FastkitResult<String> {
        let inner = self.read()?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }

    fn remove_file(&self, path: &Path) -> FastkitResult<()> {
        let mut inner = self.write()?;
        inner.check_removable(path)?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ApplicationError::FileNotFound { path: path.into() }.into())
    }

    fn remove_dir_all(&self, path: &Path) -> FastkitResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::FileNotFound { path: path.into() }.into());
        }
        inner.check_removable(path)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }

    fn list_dir(&self, path: &Path) -> FastkitResult<Vec<PathBuf>> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::FileNotFound { path: path.into() }.into());
        }
        Ok(inner.children(path, false))
    }

    fn walk(&self, path: &Path) -> FastkitResult<Vec<PathBuf>> {
        Ok(self.read()?.children(path, true))
    }
}
