//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the generators need from the outside world.
//! The `fastkit-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::RenderContext;
use crate::error::FastkitResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `fastkit_adapters::filesystem::LocalFilesystem` (production)
/// - `fastkit_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
///
/// Paths are absolute or relative to the process working directory; the
/// services only ever pass paths joined onto a project root.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> FastkitResult<()>;

    /// Write UTF-8 content to a file, replacing it. Parents must exist.
    fn write_file(&self, path: &Path, content: &str) -> FastkitResult<()>;

    /// Read a UTF-8 file. A missing file is `ApplicationError::FileNotFound`.
    fn read_to_string(&self, path: &Path) -> FastkitResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> FastkitResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> FastkitResult<()>;

    /// Direct children of a directory, sorted.
    fn list_dir(&self, path: &Path) -> FastkitResult<Vec<PathBuf>>;

    /// Every file and directory below `path` (excluding `path`), sorted.
    fn walk(&self, path: &Path) -> FastkitResult<Vec<PathBuf>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `fastkit_adapters::renderer::MiniJinjaRenderer`
///
/// Rendering is pure: the same id and context always yield the same text.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render the template registered under `template_id`.
    ///
    /// An unknown id is `ApplicationError::TemplateNotFound`.
    fn render(&self, template_id: &str, context: &RenderContext) -> FastkitResult<String>;

    /// Whether a template is registered under `template_id`.
    fn has_template(&self, template_id: &str) -> bool;
}
