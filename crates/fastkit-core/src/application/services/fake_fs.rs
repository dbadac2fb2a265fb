//! Minimal in-crate filesystem double for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::{ApplicationError, ports::Filesystem};
use crate::error::FastkitResult;

#[derive(Default)]
pub struct FakeFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    /// Paths whose removal fails.
    locked: Mutex<BTreeSet<PathBuf>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        self.files.lock().unwrap().insert(path, content.to_string());
        self
    }

    pub fn lock_path(&self, path: impl Into<PathBuf>) {
        self.locked.lock().unwrap().insert(path.into());
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    fn add_dirs(&self, path: &Path) {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_unlocked(&self, path: &Path) -> FastkitResult<()> {
        if self.locked.lock().unwrap().contains(path) {
            return Err(ApplicationError::fs(path, "permission denied").into());
        }
        Ok(())
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> FastkitResult<()> {
        self.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> FastkitResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> FastkitResult<String> {
        self.content(path).ok_or_else(|| {
            ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.dirs.lock().unwrap().contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }

    fn remove_file(&self, path: &Path) -> FastkitResult<()> {
        self.check_unlocked(path)?;
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ApplicationError::FileNotFound { path: path.into() }.into())
    }

    fn remove_dir_all(&self, path: &Path) -> FastkitResult<()> {
        self.check_unlocked(path)?;
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        self.dirs.lock().unwrap().retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> FastkitResult<Vec<PathBuf>> {
        let mut out: BTreeSet<PathBuf> = BTreeSet::new();
        for p in self.files.lock().unwrap().keys() {
            if p.parent() == Some(path) {
                out.insert(p.clone());
            }
        }
        for p in self.dirs.lock().unwrap().iter() {
            if p.parent() == Some(path) {
                out.insert(p.clone());
            }
        }
        Ok(out.into_iter().collect())
    }

    fn walk(&self, path: &Path) -> FastkitResult<Vec<PathBuf>> {
        let mut out: BTreeSet<PathBuf> = BTreeSet::new();
        for p in self.files.lock().unwrap().keys() {
            if p.starts_with(path) && p != path {
                out.insert(p.clone());
            }
        }
        for p in self.dirs.lock().unwrap().iter() {
            if p.starts_with(path) && p != path {
                out.insert(p.clone());
            }
        }
        Ok(out.into_iter().collect())
    }
}
