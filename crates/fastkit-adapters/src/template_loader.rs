//! Filesystem-based template overlay loader.
//!
//! Reads a directory of template sources and maps each file to a template id
//! relative to the directory root. Ids use forward slashes on every platform
//! and drop an optional `.jinja` suffix, so an overlay can mirror the
//! embedded layout file for file.
//!
//! # Directory layout expected
//!
//! ```text
//! my-templates/
//! ├── service/
//! │   └── app/
//! │       └── main.py.jinja     ← overrides "service/app/main.py"
//! └── services/
//!     └── cache/
//!         └── redis_client.py   ← overrides "services/cache/redis_client.py"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use fastkit_core::{
    application::ApplicationError,
    error::{FastkitError, FastkitResult},
};

/// Suffix stripped from overlay file names.
pub const TEMPLATE_SUFFIX: &str = ".jinja";

/// Loads template sources from a directory tree.
///
/// Files that cannot be read as UTF-8 emit a `WARN` log and are skipped;
/// they do not prevent other templates from loading.
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    /// Create a loader pointed at `templates_dir`.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Load every readable file below the directory as `(id, source)`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::FileNotFound`] if the directory is missing,
    /// and [`ApplicationError::FilesystemError`] if it cannot be walked.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> FastkitResult<Vec<(String, String)>> {
        if !self.templates_dir.is_dir() {
            return Err(ApplicationError::FileNotFound {
                path: self.templates_dir.clone(),
            }
            .into());
        }

        let mut templates = Vec::new();
        for walk_entry in WalkDir::new(&self.templates_dir)
            .min_depth(1)
            .sort_by_file_name()
        {
            let walk_entry = walk_entry.map_err(|e| {
                FastkitError::from(ApplicationError::FilesystemError {
                    path: self.templates_dir.clone(),
                    reason: format!("directory walk error: {e}"),
                })
            })?;
            if !walk_entry.file_type().is_file() {
                continue; // Skip directories, symlinks and other special types.
            }

            let abs_path = walk_entry.path();
            let Ok(rel) = abs_path.strip_prefix(&self.templates_dir) else {
                continue;
            };
            let id = template_id(rel);

            match fs::read_to_string(abs_path) {
                Ok(source) => {
                    debug!(id = %id, "loaded overlay template");
                    templates.push((id, source));
                }
                Err(e) => {
                    warn!(
                        path  = %abs_path.display(),
                        error = %e,
                        "skipping unreadable template file"
                    );
                }
            }
        }

        debug!(count = templates.len(), "finished loading overlay templates");
        Ok(templates)
    }
}

/// Template id for a path relative to the overlay root.
pub fn template_id(rel: &Path) -> String {
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    match joined.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => joined,
    }
}
