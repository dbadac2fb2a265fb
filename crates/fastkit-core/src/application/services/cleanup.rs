//! Best-effort removal of previously generated artifacts.
//!
//! Nothing in here aborts on a failed removal: every failure is logged with
//! `warn!` and recorded in the returned [`CleanupReport`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    application::{ports::Filesystem, services::dependency_manager::DependencyManager},
    domain::{
        CleanupReport, ServiceCategory,
        capabilities::{self, ServiceDef},
        manifest::MANIFEST_FILE,
        patching,
    },
};

/// Top-level directories a project wipe removes.
pub const PROJECT_DIRECTORIES: &[&str] = &[
    "app", "tests", "infra", ".github", "services", "shared", "src", "backend", "frontend",
];

/// Top-level files a project wipe removes.
pub const PROJECT_FILES: &[&str] = &[
    MANIFEST_FILE,
    "README.md",
    ".gitignore",
    "Dockerfile",
    ".dockerignore",
    "docker-compose.yml",
    "docker-compose.yaml",
    "docker-compose.dev.yml",
    "docker-compose.dev.yaml",
    "docker-compose.prod.yml",
    "docker-compose.prod.yaml",
];

pub(crate) fn config_path(project: &Path) -> PathBuf {
    project.join("app").join("core").join("config.py")
}

pub(crate) fn main_path(project: &Path) -> PathBuf {
    project.join("app").join("main.py")
}

pub(crate) fn dependencies_path(project: &Path) -> PathBuf {
    project.join("app").join("core").join("dependencies.py")
}

pub struct CleanupEngine {
    fs: Arc<dyn Filesystem>,
    deps: DependencyManager,
}

impl CleanupEngine {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        let deps = DependencyManager::new(Arc::clone(&fs));
        Self { fs, deps }
    }

    fn remove_file(&self, path: &Path, report: &mut CleanupReport) {
        if !self.fs.exists(path) {
            return;
        }
        match self.fs.remove_file(path) {
            Ok(()) => report.record_removed(path),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not remove file");
                report.record_failure(path, err.to_string());
            }
        }
    }

    fn remove_dir(&self, path: &Path, report: &mut CleanupReport) {
        if !self.fs.exists(path) {
            return;
        }
        match self.fs.remove_dir_all(path) {
            Ok(()) => report.record_removed(path),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not remove directory");
                report.record_failure(path, err.to_string());
            }
        }
    }

    /// Rewrite a file through a patching transform, recording the outcome.
    fn rewrite(
        &self,
        path: &Path,
        transform: impl FnOnce(&str) -> String,
        report: &mut CleanupReport,
    ) {
        if !self.fs.exists(path) {
            return;
        }
        let result = self.fs.read_to_string(path).and_then(|content| {
            let updated = transform(&content);
            if updated == content {
                return Ok(false);
            }
            self.fs.write_file(path, &updated).map(|()| true)
        });
        match result {
            Ok(true) => report.record_patched(path),
            Ok(false) => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not rewrite file");
                report.record_failure(path, err.to_string());
            }
        }
    }

    /// Delete the provider-specific files of a category.
    pub fn cleanup_service_files(&self, project: &Path, category: ServiceCategory) -> CleanupReport {
        let mut report = CleanupReport::new();
        let Some(def) = capabilities::find_service(category) else {
            return report;
        };
        let dir = project.join("app").join(def.directory);
        for file in def.cleanup_files() {
            self.remove_file(&dir.join(file), &mut report);
        }
        report
    }

    /// Remove a labeled settings section plus any stray field lines.
    pub fn cleanup_config_section(
        &self,
        config: &Path,
        section: &str,
        field_names: &[&str],
    ) -> CleanupReport {
        let mut report = CleanupReport::new();
        self.rewrite(
            config,
            |content| patching::remove_config_section(content, section, field_names),
            &mut report,
        );
        report
    }

    /// Remove every line of `main` that starts with `prefix`.
    pub fn cleanup_import_line(&self, main: &Path, prefix: &str) -> CleanupReport {
        let mut report = CleanupReport::new();
        self.rewrite(
            main,
            |content| patching::remove_lines_with_prefix(content, prefix),
            &mut report,
        );
        report
    }

    /// Remove the appended auth block from `app/core/dependencies.py`.
    pub fn cleanup_auth_dependencies(&self, project: &Path) -> CleanupReport {
        let mut report = CleanupReport::new();
        self.rewrite(
            &dependencies_path(project),
            |content| {
                patching::truncate_from_line(content, patching::AUTH_DEPENDENCIES_HEADER)
                    .unwrap_or_else(|| content.to_string())
            },
            &mut report,
        );
        report
    }

    /// Remove every package any provider of `category` declares.
    pub fn cleanup_dependencies_for_category(
        &self,
        manifest: &Path,
        category: ServiceCategory,
    ) -> CleanupReport {
        let mut report = CleanupReport::new();
        if !self.fs.exists(manifest) {
            return report;
        }
        let names: Vec<String> = capabilities::category_package_names(category)
            .into_iter()
            .collect();
        match self.deps.remove_dependencies(manifest, &names) {
            Ok(true) => report.record_patched(manifest),
            Ok(false) => {}
            Err(err) => {
                warn!(path = %manifest.display(), error = %err, "Could not clean manifest");
                report.record_failure(manifest, err.to_string());
            }
        }
        report
    }

    fn cleanup_imports(&self, project: &Path, def: &ServiceDef) -> CleanupReport {
        let main = main_path(project);
        let mut report = CleanupReport::new();
        for prefix in def.import_prefixes() {
            report.merge(self.cleanup_import_line(&main, &prefix));
        }
        report
    }

    /// Undo everything a service generator did for `category`.
    #[instrument(skip_all, fields(project = %project.display(), category = %category))]
    pub fn cleanup_all_service_files(&self, project: &Path, category: ServiceCategory) -> CleanupReport {
        let mut report = CleanupReport::new();
        let Some(def) = capabilities::find_service(category) else {
            return report;
        };

        report.merge(self.cleanup_service_files(project, category));
        report.merge(self.cleanup_config_section(
            &config_path(project),
            def.config_section,
            &def.config_fields(),
        ));
        report.merge(self.cleanup_imports(project, def));
        if category == ServiceCategory::Auth {
            report.merge(self.cleanup_auth_dependencies(project));
        }
        report.merge(self.cleanup_dependencies_for_category(&project.join(MANIFEST_FILE), category));

        info!(
            removed = report.removed.len(),
            failures = report.failures.len(),
            "Service cleanup finished"
        );
        report
    }

    /// Wipe a generated project back to an empty directory.
    #[instrument(skip_all, fields(project = %project.display()))]
    pub fn cleanup_entire_project(&self, project: &Path) -> CleanupReport {
        let mut report = CleanupReport::new();

        for dir in PROJECT_DIRECTORIES {
            self.remove_dir(&project.join(dir), &mut report);
        }
        for file in PROJECT_FILES {
            self.remove_file(&project.join(file), &mut report);
        }
        self.purge_bytecode(project, &mut report);

        info!(
            removed = report.removed.len(),
            failures = report.failures.len(),
            "Project cleanup finished"
        );
        report
    }

    /// Remove `__pycache__` directories and `*.pyc`/`*.pyo` files anywhere below.
    fn purge_bytecode(&self, project: &Path, report: &mut CleanupReport) {
        let entries = match self.fs.walk(project) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %project.display(), error = %err, "Could not scan for bytecode");
                report.record_failure(project, err.to_string());
                return;
            }
        };

        for path in entries {
            let is_cache_dir = path.file_name().is_some_and(|n| n == "__pycache__");
            let is_bytecode = path
                .extension()
                .is_some_and(|ext| ext == "pyc" || ext == "pyo");
            if is_cache_dir {
                self.remove_dir(&path, report);
            } else if is_bytecode {
                self.remove_file(&path, report);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
