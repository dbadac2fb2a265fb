//! Sub-generators for the pluggable services (db, cache, auth, jobs).
//!
//! One generic generator covers all four categories; everything that differs
//! between them comes from the category's [`ServiceDef`] and the provider's
//! registry entry.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::services::{
        cleanup::{config_path, dependencies_path, main_path},
        materializer::Materializer,
    },
    domain::{
        GeneratedTree, RenderContext, ServiceCategory,
        capabilities::{
            self, AUTH_DEPENDENCIES_TEMPLATE, AUTH_SERVICE, CACHE_SERVICE, DB_SERVICE,
            JOBS_SERVICE, ServiceDef,
        },
        patching,
    },
    error::FastkitResult,
};

const NONE: &str = "none";

pub struct ServiceGenerator {
    def: &'static ServiceDef,
    materializer: Materializer,
}

impl ServiceGenerator {
    pub fn database(materializer: Materializer) -> Self {
        Self::with_def(&DB_SERVICE, materializer)
    }

    pub fn cache(materializer: Materializer) -> Self {
        Self::with_def(&CACHE_SERVICE, materializer)
    }

    pub fn auth(materializer: Materializer) -> Self {
        Self::with_def(&AUTH_SERVICE, materializer)
    }

    pub fn jobs(materializer: Materializer) -> Self {
        Self::with_def(&JOBS_SERVICE, materializer)
    }

    /// Generator for any pluggable category.
    pub fn for_category(
        category: ServiceCategory,
        materializer: Materializer,
    ) -> FastkitResult<Self> {
        let def = capabilities::service_def(category)?;
        Ok(Self::with_def(def, materializer))
    }

    fn with_def(def: &'static ServiceDef, materializer: Materializer) -> Self {
        Self { def, materializer }
    }

    pub fn category(&self) -> ServiceCategory {
        self.def.category
    }

    /// Registry entries after this category. New sections and imports go in
    /// front of theirs so shared files keep registry order.
    fn successors(&self) -> impl Iterator<Item = &'static ServiceDef> + '_ {
        capabilities::SERVICE_REGISTRY
            .iter()
            .copied()
            .skip_while(|def| def.category != self.def.category)
            .skip(1)
    }

    fn context(&self, provider: &str, project_name: &str) -> RenderContext {
        RenderContext::new(project_name)
            .with_str("provider", provider)
            .with_str("service", self.def.directory)
    }

    /// Write the common files and the provider's client file under
    /// `app/<dir>`. A no-op for `none`.
    #[instrument(skip_all, fields(category = %self.def.category, provider = provider))]
    pub fn generate(
        &self,
        project: &Path,
        provider: &str,
        project_name: &str,
    ) -> FastkitResult<GeneratedTree> {
        let mut tree = GeneratedTree::new();
        if provider == NONE {
            return Ok(tree);
        }

        let dir = project.join("app").join(self.def.directory);
        let ctx = self.context(provider, project_name);
        self.materializer.ensure_dir(&dir, &mut tree)?;

        for file in self.def.common_files {
            self.materializer
                .render_to(file.template, &ctx, &dir.join(file.file_name), &mut tree)?;
        }

        match capabilities::resolve(self.def.category, provider).and_then(|d| d.client) {
            Some(client) => {
                self.materializer.render_to(
                    client.template,
                    &ctx,
                    &dir.join(client.file_name),
                    &mut tree,
                )?;
            }
            None => debug!("Unknown provider, no client file written"),
        }

        info!(files = tree.file_count(), "Service generated");
        Ok(tree)
    }

    /// Insert the provider's settings section into `app/core/config.py`.
    ///
    /// Returns `false` without writing when the section is already present,
    /// the anchor or file is missing, or the provider is `none` or unknown.
    pub fn update_configuration(
        &self,
        project: &Path,
        provider: &str,
        project_name: &str,
    ) -> FastkitResult<bool> {
        let mut tree = GeneratedTree::new();
        self.update_configuration_into(project, provider, project_name, &mut tree)
    }

    fn update_configuration_into(
        &self,
        project: &Path,
        provider: &str,
        project_name: &str,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<bool> {
        if provider == NONE {
            return Ok(false);
        }
        let Some(def) = capabilities::resolve(self.def.category, provider) else {
            return Ok(false);
        };
        if def.settings.is_empty() {
            return Ok(false);
        }

        let ctx = self.context(provider, project_name);
        let fields: Vec<String> = def.settings.iter().map(|line| ctx.render(line)).collect();
        let block = patching::settings_block(self.def.config_section, &fields);
        let anchors: Vec<String> = self
            .successors()
            .map(|def| format!("{}{}", patching::INDENT, def.config_section))
            .chain([patching::CONFIG_ANCHOR.to_string()])
            .collect();

        self.materializer.patch(
            &config_path(project),
            |content| {
                patching::insert_once_before_first(content, self.def.config_section, &block, &anchors)
            },
            tree,
        )
    }

    /// Add the category import to `app/main.py` if it is not wired yet.
    pub fn ensure_imports(&self, project: &Path, provider: &str) -> FastkitResult<bool> {
        let mut tree = GeneratedTree::new();
        self.ensure_imports_into(project, provider, &mut tree)
    }

    fn ensure_imports_into(
        &self,
        project: &Path,
        provider: &str,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<bool> {
        if provider == NONE {
            return Ok(false);
        }
        let marker = self.def.import_marker();
        let successors: Vec<String> = self
            .successors()
            .flat_map(|def| def.import_prefixes())
            .collect();
        self.materializer.patch(
            &main_path(project),
            |content| {
                patching::insert_import_before(content, self.def.import_line, &marker, &successors)
            },
            tree,
        )
    }

    /// Append the FastAPI auth dependencies to `app/core/dependencies.py`.
    ///
    /// Only the auth generator does anything here; the others report `false`.
    pub fn generate_dependency_injectors(
        &self,
        project: &Path,
        provider: &str,
        project_name: &str,
    ) -> FastkitResult<bool> {
        let mut tree = GeneratedTree::new();
        self.generate_dependency_injectors_into(project, provider, project_name, &mut tree)
    }

    fn generate_dependency_injectors_into(
        &self,
        project: &Path,
        provider: &str,
        project_name: &str,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<bool> {
        if self.def.category != ServiceCategory::Auth || provider == NONE {
            return Ok(false);
        }
        let path = dependencies_path(project);
        if !self.materializer.fs().exists(&path) {
            return Ok(false);
        }
        let current = self.materializer.fs().read_to_string(&path)?;
        if current.contains(patching::AUTH_DEPENDENCIES_MARKER) {
            return Ok(false);
        }

        let block = self
            .materializer
            .renderer()
            .render(AUTH_DEPENDENCIES_TEMPLATE, &self.context(provider, project_name))?;
        self.materializer.patch(
            &path,
            |content| patching::append_once(content, patching::AUTH_DEPENDENCIES_MARKER, &block),
            tree,
        )
    }

    /// Full wiring for one provider: files, settings, import and, for auth,
    /// the dependency block.
    pub fn apply(
        &self,
        project: &Path,
        provider: &str,
        project_name: &str,
    ) -> FastkitResult<GeneratedTree> {
        let mut tree = self.generate(project, provider, project_name)?;
        self.update_configuration_into(project, provider, project_name, &mut tree)?;
        self.ensure_imports_into(project, provider, &mut tree)?;
        self.generate_dependency_injectors_into(project, provider, project_name, &mut tree)?;
        Ok(tree)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::{always, eq};

    use super::*;
    use crate::application::ports::{Filesystem, MockTemplateRenderer};
    use crate::application::services::fake_fs::FakeFs;

    const CONFIG: &str = "import os\n\nclass Settings:\n    DEBUG: bool = False\n\n    class Config:\n        env_file = \".env\"\n";
    const MAIN: &str = "from fastapi import FastAPI\n\napp = FastAPI()\n";

    fn echo_renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|id, _| Ok(format!("# {id}\n")));
        renderer.expect_has_template().returning(|_| true);
        renderer
    }

    fn project() -> Arc<FakeFs> {
        Arc::new(
            FakeFs::new()
                .with_file("/p/app/core/config.py", CONFIG)
                .with_file("/p/app/main.py", MAIN)
                .with_file("/p/app/core/dependencies.py", "from app.core.config import settings\n"),
        )
    }

    fn generator(
        make: fn(Materializer) -> ServiceGenerator,
        fs: Arc<FakeFs>,
        renderer: MockTemplateRenderer,
    ) -> ServiceGenerator {
        make(Materializer::new(fs, Arc::new(renderer)))
    }

    // ========================================================================
    // generate
    // ========================================================================

    #[test]
    fn db_writes_common_files_and_one_client() {
        let fs = project();
        let gen_ = generator(ServiceGenerator::database, fs.clone(), echo_renderer());

        let tree = gen_.generate(Path::new("/p"), "postgresql", "shop").unwrap();

        for file in ["__init__.py", "base.py", "session.py", "base_model.py", "postgresql_client.py"] {
            assert!(tree.contains_file(format!("/p/app/db/{file}")), "missing {file}");
        }
        assert_eq!(tree.file_count(), 5);
        assert!(!fs.exists(Path::new("/p/app/db/mysql_client.py")));
    }

    #[test]
    fn regenerating_is_idempotent() {
        let fs = project();
        let gen_ = generator(ServiceGenerator::database, fs.clone(), echo_renderer());

        let first = gen_.generate(Path::new("/p"), "mysql", "shop").unwrap();
        let before: Vec<_> = first.files().map(|p| (p.to_path_buf(), fs.content(p))).collect();
        let second = gen_.generate(Path::new("/p"), "mysql", "shop").unwrap();

        assert_eq!(first.files().collect::<Vec<_>>(), second.files().collect::<Vec<_>>());
        for (path, content) in before {
            assert_eq!(fs.content(&path), content, "{}", path.display());
        }
    }

    #[test]
    fn client_template_is_requested_by_id() {
        let fs = project();
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .with(eq("services/cache/__init__.py"), always())
            .times(1)
            .returning(|_, _| Ok(String::new()));
        renderer
            .expect_render()
            .with(eq("services/cache/memcached_client.py"), always())
            .times(1)
            .returning(|_, ctx| Ok(format!("provider={}", ctx.get_str("provider").unwrap_or(""))));
        let gen_ = generator(ServiceGenerator::cache, fs.clone(), renderer);

        gen_.generate(Path::new("/p"), "memcached", "shop").unwrap();

        assert_eq!(
            fs.content("/p/app/cache/memcached_client.py").as_deref(),
            Some("provider=memcached")
        );
    }

    #[test]
    fn none_provider_writes_nothing() {
        let fs = project();
        let gen_ = generator(ServiceGenerator::jobs, fs.clone(), MockTemplateRenderer::new());
        let tree = gen_.generate(Path::new("/p"), "none", "shop").unwrap();
        assert!(tree.is_empty());
        assert!(!gen_.update_configuration(Path::new("/p"), "none", "shop").unwrap());
        assert!(!gen_.ensure_imports(Path::new("/p"), "none").unwrap());
    }

    #[test]
    fn unknown_provider_writes_common_files_only() {
        let fs = project();
        let gen_ = generator(ServiceGenerator::jobs, fs.clone(), echo_renderer());
        let tree = gen_.generate(Path::new("/p"), "huey", "shop").unwrap();
        assert_eq!(tree.file_count(), 2);
        assert!(tree.contains_file("/p/app/jobs/tasks.py"));
    }

    // ========================================================================
    // configuration / imports / dependency injection
    // ========================================================================

    #[test]
    fn configuration_is_inserted_once() {
        let fs = project();
        let gen_ = generator(ServiceGenerator::database, fs.clone(), echo_renderer());

        assert!(gen_.update_configuration(Path::new("/p"), "sqlite", "Shop API").unwrap());
        assert!(!gen_.update_configuration(Path::new("/p"), "sqlite", "Shop API").unwrap());

        let config = fs.content("/p/app/core/config.py").unwrap();
        assert_eq!(config.matches("# Database settings").count(), 1);
        assert!(config.contains("sqlite:///./shop_api.db"));
        assert!(config.find("# Database settings").unwrap() < config.find("class Config").unwrap());
    }

    #[test]
    fn configuration_without_anchor_is_noop() {
        let fs = Arc::new(FakeFs::new().with_file("/p/app/core/config.py", "X = 1\n"));
        let gen_ = generator(ServiceGenerator::cache, fs.clone(), echo_renderer());
        assert!(!gen_.update_configuration(Path::new("/p"), "redis", "shop").unwrap());
        assert_eq!(fs.content("/p/app/core/config.py").as_deref(), Some("X = 1\n"));
    }

    #[test]
    fn missing_config_is_noop() {
        let fs = Arc::new(FakeFs::new());
        let gen_ = generator(ServiceGenerator::cache, fs, echo_renderer());
        assert!(!gen_.update_configuration(Path::new("/p"), "redis", "shop").unwrap());
    }

    #[test]
    fn imports_are_added_once() {
        let fs = project();
        let gen_ = generator(ServiceGenerator::jobs, fs.clone(), echo_renderer());
        assert!(gen_.ensure_imports(Path::new("/p"), "celery").unwrap());
        assert!(!gen_.ensure_imports(Path::new("/p"), "celery").unwrap());
        assert_eq!(
            fs.content("/p/app/main.py").unwrap(),
            "from fastapi import FastAPI\nfrom app.jobs import scheduler\n\napp = FastAPI()\n"
        );
    }

    #[test]
    fn only_auth_generates_dependency_injectors() {
        let fs = project();
        let db = generator(ServiceGenerator::database, fs.clone(), echo_renderer());
        assert!(!db
            .generate_dependency_injectors(Path::new("/p"), "postgresql", "shop")
            .unwrap());

        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .with(eq(AUTH_DEPENDENCIES_TEMPLATE), always())
            .times(1)
            .returning(|_, _| {
                Ok("# Authentication dependencies\ndef get_current_user():\n    ...\n".into())
            });
        let auth = generator(ServiceGenerator::auth, fs.clone(), renderer);
        assert!(auth
            .generate_dependency_injectors(Path::new("/p"), "jwt", "shop")
            .unwrap());
        assert!(!auth
            .generate_dependency_injectors(Path::new("/p"), "jwt", "shop")
            .unwrap());

        let deps = fs.content("/p/app/core/dependencies.py").unwrap();
        assert_eq!(deps.matches("def get_current_user").count(), 1);
    }

    #[test]
    fn apply_records_patched_files() {
        let fs = project();
        let gen_ = generator(ServiceGenerator::cache, fs, echo_renderer());
        let tree = gen_.apply(Path::new("/p"), "redis", "shop").unwrap();
        let patched: Vec<_> = tree.patched().collect();
        assert!(patched.contains(&Path::new("/p/app/core/config.py")));
        assert!(patched.contains(&Path::new("/p/app/main.py")));
    }

    #[test]
    fn for_category_rejects_manifest_only_categories() {
        let m = Materializer::new(Arc::new(FakeFs::new()), Arc::new(MockTemplateRenderer::new()));
        assert!(ServiceGenerator::for_category(ServiceCategory::Monitoring, m).is_err());
    }
}
