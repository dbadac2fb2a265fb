//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use fastkit_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{FastkitError, FastkitResult},
};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> FastkitResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> FastkitResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> FastkitResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_file(&self, path: &Path) -> FastkitResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> FastkitResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn list_dir(&self, path: &Path) -> FastkitResult<Vec<PathBuf>> {
        let read_dir =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        let mut entries = read_dir
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| map_io_error(path, e, "read directory entry"))?;
        entries.sort();
        Ok(entries)
    }

    fn walk(&self, path: &Path) -> FastkitResult<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let at = e.path().unwrap_or(path).to_path_buf();
                FastkitError::from(ApplicationError::FilesystemError {
                    path: at,
                    reason: format!("Failed to walk directory: {e}"),
                })
            })?;
            entries.push(entry.into_path());
        }
        Ok(entries)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> FastkitError {
    if e.kind() == io::ErrorKind::NotFound && operation == "read file" {
        return ApplicationError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into();
    }
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
