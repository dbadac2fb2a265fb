//! Keeps the `pyproject.toml` dependency array in step with the chosen services.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::Filesystem,
    domain::{
        ServiceCategory,
        capabilities::{self, ProviderDef},
        manifest::Manifest,
    },
    error::FastkitResult,
};

pub struct DependencyManager {
    fs: Arc<dyn Filesystem>,
}

impl DependencyManager {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }

    /// Dependency specifiers for a pair; empty for unknown pairs.
    pub fn lookup(category: ServiceCategory, provider: &str) -> &'static [&'static str] {
        capabilities::lookup(category, provider)
    }

    /// Registry entry for a pair, `None` on a lookup miss.
    pub fn resolve(category: ServiceCategory, provider: &str) -> Option<&'static ProviderDef> {
        capabilities::resolve(category, provider)
    }

    /// Parse the manifest, or `None` if it is malformed.
    fn load(&self, manifest: &Path) -> FastkitResult<Option<Manifest>> {
        let content = self.fs.read_to_string(manifest)?;
        match Manifest::parse(&content) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => {
                warn!(path = %manifest.display(), error = %err, "Leaving manifest unchanged");
                Ok(None)
            }
        }
    }

    /// Package names currently declared. Empty for a malformed manifest.
    pub fn current_package_names(&self, manifest: &Path) -> FastkitResult<BTreeSet<String>> {
        Ok(self
            .load(manifest)?
            .map(|m| m.package_names())
            .unwrap_or_default())
    }

    /// Append specs whose package is not yet declared. Returns whether the
    /// manifest changed; it is written at most once.
    #[instrument(skip_all, fields(manifest = %manifest.display(), specs = specs.len()))]
    pub fn add_dependencies<S: AsRef<str>>(
        &self,
        manifest: &Path,
        specs: &[S],
    ) -> FastkitResult<bool> {
        let Some(parsed) = self.load(manifest)? else {
            return Ok(false);
        };
        match parsed.with_added(specs) {
            Some(updated) => {
                self.fs.write_file(manifest, &updated)?;
                info!("Manifest dependencies updated");
                Ok(true)
            }
            None => {
                debug!("All dependencies already present");
                Ok(false)
            }
        }
    }

    /// Drop every entry whose package name matches. Returns whether it changed.
    #[instrument(skip_all, fields(manifest = %manifest.display()))]
    pub fn remove_dependencies<S: AsRef<str>>(
        &self,
        manifest: &Path,
        names_or_specs: &[S],
    ) -> FastkitResult<bool> {
        let Some(parsed) = self.load(manifest)? else {
            return Ok(false);
        };
        match parsed.with_removed(names_or_specs) {
            Some(updated) => {
                self.fs.write_file(manifest, &updated)?;
                info!(removed = names_or_specs.len(), "Manifest dependencies removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Add the dependencies of every selected pair in one write.
    pub fn sync_for_services(
        &self,
        manifest: &Path,
        selections: &[(ServiceCategory, &str)],
    ) -> FastkitResult<bool> {
        let specs: Vec<&str> = selections
            .iter()
            .flat_map(|(category, provider)| Self::lookup(*category, provider).iter().copied())
            .collect();
        self.add_dependencies(manifest, &specs)
    }

    /// Declare the packages of `selections` after every other entry, in
    /// selection order, where a fresh sync of the same choices puts them.
    /// Used after a service swap; returns whether the manifest changed.
    #[instrument(skip_all, fields(manifest = %manifest.display(), services = selections.len()))]
    pub fn resync_services(
        &self,
        manifest: &Path,
        selections: &[(ServiceCategory, &str)],
    ) -> FastkitResult<bool> {
        let Some(parsed) = self.load(manifest)? else {
            return Ok(false);
        };
        let specs: Vec<&str> = selections
            .iter()
            .flat_map(|(category, provider)| Self::lookup(*category, provider).iter().copied())
            .collect();
        match parsed.with_tail(&specs) {
            Some(updated) => {
                self.fs.write_file(manifest, &updated)?;
                info!("Service dependencies re-synced");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fake_fs::FakeFs;
    use crate::error::FastkitError;

    const MANIFEST: &str = "[project]\nname = \"shop\"\ndependencies = [\n    \"fastapi>=0.116\",\n]\n\n[tool.fastkit]\nproject = true\n";

    fn setup(content: &str) -> (Arc<FakeFs>, DependencyManager) {
        let fs = Arc::new(FakeFs::new().with_file("/p/pyproject.toml", content));
        (fs.clone(), DependencyManager::new(fs))
    }

    fn manifest() -> &'static Path {
        Path::new("/p/pyproject.toml")
    }

    #[test]
    fn lookup_and_resolve() {
        assert_eq!(
            DependencyManager::lookup(ServiceCategory::Cache, "redis"),
            &["redis>=4.0.0"]
        );
        assert!(DependencyManager::lookup(ServiceCategory::Cache, "oracle").is_empty());
        assert!(DependencyManager::resolve(ServiceCategory::Serialization, "json").is_some());
    }

    #[test]
    fn sync_adds_each_package_once() {
        let (fs, deps) = setup(MANIFEST);
        let changed = deps
            .sync_for_services(
                manifest(),
                &[
                    (ServiceCategory::Db, "postgresql"),
                    (ServiceCategory::Jobs, "celery"),
                    (ServiceCategory::Cache, "redis"),
                ],
            )
            .unwrap();
        assert!(changed);

        let content = fs.content(manifest()).unwrap();
        assert_eq!(content.matches("\"redis>=").count(), 1);
        assert!(content.contains("sqlalchemy>=2.0.0"));
        assert!(content.contains("celery>=5.2.0"));
        assert!(content.ends_with("project = true\n"));
    }

    #[test]
    fn sync_twice_is_stable() {
        let (fs, deps) = setup(MANIFEST);
        deps.sync_for_services(manifest(), &[(ServiceCategory::Auth, "jwt")]).unwrap();
        let first = fs.content(manifest()).unwrap();
        let changed = deps.sync_for_services(manifest(), &[(ServiceCategory::Auth, "jwt")]).unwrap();
        assert!(!changed);
        assert_eq!(fs.content(manifest()).unwrap(), first);
    }

    #[test]
    fn unknown_provider_changes_nothing() {
        let (fs, deps) = setup(MANIFEST);
        assert!(!deps.sync_for_services(manifest(), &[(ServiceCategory::Db, "oracle")]).unwrap());
        assert_eq!(fs.content(manifest()).unwrap(), MANIFEST);
    }

    #[test]
    fn remove_keeps_other_entries() {
        let (fs, deps) = setup(MANIFEST);
        deps.sync_for_services(manifest(), &[(ServiceCategory::Cache, "redis")]).unwrap();
        assert!(deps.remove_dependencies(manifest(), &["redis"]).unwrap());
        let names = deps.current_package_names(manifest()).unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["fastapi"]);
        assert!(fs.content(manifest()).unwrap().contains("[tool.fastkit]"));
    }

    #[test]
    fn resync_after_swap_matches_fresh_sync() {
        let fresh = [(ServiceCategory::Db, "postgresql"), (ServiceCategory::Cache, "redis")];
        let (expected_fs, expected) = setup(MANIFEST);
        expected.sync_for_services(manifest(), &fresh).unwrap();

        let (fs, deps) = setup(MANIFEST);
        deps.sync_for_services(manifest(), &[(ServiceCategory::Db, "mysql"), (ServiceCategory::Cache, "redis")])
            .unwrap();
        deps.remove_dependencies(manifest(), &["sqlalchemy", "pymysql"]).unwrap();
        assert!(deps.resync_services(manifest(), &fresh).unwrap());

        assert_eq!(fs.content(manifest()), expected_fs.content(manifest()));
        assert!(!deps.resync_services(manifest(), &fresh).unwrap());
    }

    #[test]
    fn malformed_manifest_is_left_alone() {
        let broken = "[project]\nname = \"shop\"\n";
        let (fs, deps) = setup(broken);
        assert!(!deps.add_dependencies(manifest(), &["redis>=4.0.0"]).unwrap());
        assert_eq!(fs.content(manifest()).unwrap(), broken);
        assert!(deps.current_package_names(manifest()).unwrap().is_empty());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let deps = DependencyManager::new(Arc::new(FakeFs::new()));
        let err = deps.add_dependencies(manifest(), &["redis"]).unwrap_err();
        assert!(matches!(err, FastkitError::Application(_)));
    }
}
