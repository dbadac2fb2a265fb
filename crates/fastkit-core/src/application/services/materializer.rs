//! Turns rendered templates into files on a [`Filesystem`].
//!
//! Every generator writes through a `Materializer`, which records each
//! effect in the caller's [`GeneratedTree`].

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::{
    application::ports::{Filesystem, TemplateRenderer},
    domain::{FsEntry, GeneratedTree, RenderContext},
    error::FastkitResult,
};

/// Shared handle to the two driven ports.
#[derive(Clone)]
pub struct Materializer {
    fs: Arc<dyn Filesystem>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Materializer {
    pub fn new(fs: Arc<dyn Filesystem>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { fs, renderer }
    }

    pub fn fs(&self) -> &dyn Filesystem {
        self.fs.as_ref()
    }

    pub fn fs_handle(&self) -> Arc<dyn Filesystem> {
        Arc::clone(&self.fs)
    }

    pub fn renderer(&self) -> &dyn TemplateRenderer {
        self.renderer.as_ref()
    }

    /// Create `path` and its ancestors, recording it if it was missing.
    pub fn ensure_dir(&self, path: &Path, tree: &mut GeneratedTree) -> FastkitResult<()> {
        if !self.fs.is_dir(path) {
            self.fs.create_dir_all(path)?;
            tree.record(FsEntry::Directory(path.to_path_buf()));
        }
        Ok(())
    }

    /// Write `text`, creating missing ancestors and overwriting any file.
    pub fn write(&self, path: &Path, text: &str, tree: &mut GeneratedTree) -> FastkitResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.ensure_dir(parent, tree)?;
            }
        }
        self.fs.write_file(path, text)?;
        debug!(path = %path.display(), bytes = text.len(), "Wrote file");
        tree.record(FsEntry::File(path.to_path_buf()));
        Ok(())
    }

    /// Render `template_id` and write the result to `path`.
    pub fn render_to(
        &self,
        template_id: &str,
        ctx: &RenderContext,
        path: &Path,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<()> {
        let text = self.renderer.render(template_id, ctx)?;
        self.write(path, &text, tree)
    }

    /// Write unless the file exists and `force` is off. Returns whether it wrote.
    pub fn write_preserving(
        &self,
        path: &Path,
        text: impl FnOnce() -> FastkitResult<String>,
        force: bool,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<bool> {
        if !force && self.fs.exists(path) {
            debug!(path = %path.display(), "Preserved existing file");
            tree.record(FsEntry::Skipped(path.to_path_buf()));
            return Ok(false);
        }
        self.write(path, &text()?, tree)?;
        Ok(true)
    }

    /// Apply a text transform to an existing file.
    ///
    /// Returns `false` when the file is missing or the transform reports no
    /// change; nothing is written in either case.
    pub fn patch(
        &self,
        path: &Path,
        transform: impl FnOnce(&str) -> Option<String>,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<bool> {
        if !self.fs.exists(path) {
            return Ok(false);
        }
        let content = self.fs.read_to_string(path)?;
        match transform(&content) {
            Some(updated) => {
                self.fs.write_file(path, &updated)?;
                debug!(path = %path.display(), "Patched file");
                tree.record(FsEntry::Patched(path.to_path_buf()));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
