//! Project Orchestrator - the driving use cases.
//!
//! Coordinates the whole workflow behind each CLI command:
//! 1. Validate names and choices (nothing touches disk before this)
//! 2. Lay out the project tree for the chosen architecture
//! 3. Wire the pluggable services into every service tree
//! 4. Sync the dependency manifest

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
        services::{
            cleanup::{CleanupEngine, main_path},
            dependency_manager::DependencyManager,
            domain_generator::DomainGenerator,
            layout::{self, Placement},
            materializer::Materializer,
            service_generator::ServiceGenerator,
        },
    },
    domain::{
        Architecture, ArchitectureConfig, AuthProvider, CacheProvider, CleanupReport, DbProvider,
        DomainValidator, FrontendConfig, FrontendLanguage, GeneratedTree, JobsProvider,
        ProjectConfig, RelativePath, RenderContext, ServiceCategory, capabilities,
        entities::render_context::to_pascal_case,
        manifest::{self, MANIFEST_FILE, Manifest},
        validation::GATEWAY_SERVICE,
    },
    error::FastkitResult,
};

/// What is at the create-project target before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    /// Missing or empty directory.
    Empty,
    /// A project this tool generated earlier.
    GeneratedProject,
    /// Some other non-empty directory.
    Occupied,
}

/// Result of `create_project`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectCreation {
    /// Present when an earlier generated project was wiped first.
    pub cleanup: Option<CleanupReport>,
    pub tree: GeneratedTree,
}

/// Result of `add_service`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceAddition {
    /// Present when an existing service was replaced.
    pub cleanup: Option<CleanupReport>,
    pub tree: GeneratedTree,
    pub manifest_changed: bool,
}

/// Cache evidence from the manifest, first match wins.
const CACHE_EVIDENCE: &[(&str, CacheProvider)] = &[
    ("redis", CacheProvider::Redis),
    ("pymemcache", CacheProvider::Memcached),
    ("boto3", CacheProvider::Dynamodb),
    ("cachetools", CacheProvider::InMemory),
];

const DB_EVIDENCE: &[(&str, DbProvider)] = &[
    ("psycopg2-binary", DbProvider::Postgresql),
    ("pymysql", DbProvider::Mysql),
    ("motor", DbProvider::Mongodb),
    ("pyodbc", DbProvider::Mssql),
    ("sqlalchemy", DbProvider::Sqlite),
];

const AUTH_EVIDENCE: &[(&str, AuthProvider)] = &[
    ("python-jose[cryptography]", AuthProvider::Jwt),
    ("python-jose", AuthProvider::Jwt),
    ("authlib", AuthProvider::OAuth),
];

const JOBS_EVIDENCE: &[(&str, JobsProvider)] = &[
    ("celery", JobsProvider::Celery),
    ("rq", JobsProvider::Rq),
    ("dramatiq", JobsProvider::Dramatiq),
    ("arq", JobsProvider::Arq),
    ("apscheduler", JobsProvider::Apscheduler),
];

/// Main orchestrator.
///
/// Owns the driven ports and hands them to the sub-generators.
pub struct ProjectOrchestrator {
    materializer: Materializer,
    deps: DependencyManager,
    cleanup: CleanupEngine,
}

impl ProjectOrchestrator {
    /// Create an orchestrator over the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use fastkit_core::application::ProjectOrchestrator;
    /// # fn demo(fs: Arc<dyn fastkit_core::application::ports::Filesystem>,
    /// #         renderer: Arc<dyn fastkit_core::application::ports::TemplateRenderer>) {
    /// let orchestrator = ProjectOrchestrator::new(fs, renderer);
    /// # }
    /// ```
    pub fn new(fs: Arc<dyn Filesystem>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        let materializer = Materializer::new(Arc::clone(&fs), renderer);
        Self {
            deps: DependencyManager::new(Arc::clone(&fs)),
            cleanup: CleanupEngine::new(fs),
            materializer,
        }
    }

    fn fs(&self) -> &dyn Filesystem {
        self.materializer.fs()
    }

    fn service_generator(&self, category: ServiceCategory) -> FastkitResult<ServiceGenerator> {
        ServiceGenerator::for_category(category, self.materializer.clone())
    }

    // ========================================================================
    // Project detection
    // ========================================================================

    /// Whether `project` holds a manifest carrying the generated-project marker.
    pub fn is_generated_project(&self, project: &Path) -> bool {
        let manifest = project.join(MANIFEST_FILE);
        self.fs().exists(&manifest)
            && self
                .fs()
                .read_to_string(&manifest)
                .is_ok_and(|content| manifest::is_generated_project_manifest(&content))
    }

    /// Classify the create-project target.
    pub fn inspect_target(&self, path: &Path) -> FastkitResult<TargetState> {
        if !self.fs().is_dir(path) || self.fs().list_dir(path)?.is_empty() {
            return Ok(TargetState::Empty);
        }
        if self.is_generated_project(path) {
            return Ok(TargetState::GeneratedProject);
        }
        Ok(TargetState::Occupied)
    }

    /// Fail unless `project` is a generated project with the service layout
    /// (`app/`, `app/core`, `app/main.py`).
    pub fn ensure_service_project(&self, project: &Path) -> FastkitResult<()> {
        if !self.is_generated_project(project) {
            return Err(ApplicationError::NotAGeneratedProject {
                path: project.to_path_buf(),
                reason: format!("no {MANIFEST_FILE} with a [tool.fastkit] marker"),
            }
            .into());
        }
        let app = project.join("app");
        let missing = [app.clone(), app.join("core"), main_path(project)]
            .into_iter()
            .find(|p| !self.fs().exists(p));
        if let Some(missing) = missing {
            return Err(ApplicationError::NotAGeneratedProject {
                path: project.to_path_buf(),
                reason: format!("{} is missing", missing.display()),
            }
            .into());
        }
        Ok(())
    }

    /// Project name from the manifest, else the directory name.
    pub fn project_name(&self, project: &Path) -> String {
        let from_manifest = self
            .fs()
            .read_to_string(&project.join(MANIFEST_FILE))
            .ok()
            .and_then(|content| manifest::project_name(&content));
        from_manifest.unwrap_or_else(|| {
            project
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "app".to_string())
        })
    }

    /// Reconstruct the choices of an existing project from its manifest.
    ///
    /// Only single-service layouts can be recovered; the architecture is
    /// reported as single-service. The Docker and CI toggles follow the
    /// presence of `Dockerfile` and the CI workflow.
    pub fn read_project_config(&self, project: &Path) -> FastkitResult<ProjectConfig> {
        let content = self.fs().read_to_string(&project.join(MANIFEST_FILE))?;
        let name = self.project_name(project);
        let packages = match Manifest::parse(&content) {
            Ok(parsed) => parsed.package_names(),
            Err(err) => {
                warn!(error = %err, "Manifest unreadable, assuming no services");
                Default::default()
            }
        };
        let has = |pkg: &str| packages.contains(pkg);

        let jobs = first_match(JOBS_EVIDENCE, &has).unwrap_or(JobsProvider::None);
        let redis_owned_by_jobs = !matches!(jobs, JobsProvider::None | JobsProvider::Apscheduler)
            && !self
                .fs()
                .exists(&project.join("app").join("cache").join("redis_client.py"));
        let cache = CACHE_EVIDENCE
            .iter()
            .filter(|(pkg, _)| !(redis_owned_by_jobs && *pkg == "redis"))
            .find(|(pkg, _)| has(*pkg))
            .map_or(CacheProvider::None, |(_, provider)| *provider);
        let database = first_match(DB_EVIDENCE, &has).unwrap_or(DbProvider::None);
        let auth = first_match(AUTH_EVIDENCE, &has).unwrap_or(AuthProvider::None);

        let config = ProjectConfig::builder()
            .name(sanitize_name(&name))
            .path(project)
            .database(database)
            .cache(cache)
            .auth(auth)
            .jobs(jobs)
            .include_docker(self.fs().exists(&project.join("Dockerfile")))
            .include_cicd(self.fs().exists(&project.join(".github/workflows/ci.yml")))
            .build()?;
        debug!(config = %config, "Inferred project configuration");
        Ok(config)
    }

    // ========================================================================
    // create-project
    // ========================================================================

    /// Create a project at `config.path()`.
    ///
    /// A non-empty target is refused unless `overwrite` is set. An earlier
    /// generated project is wiped first; any other directory is generated
    /// into as-is.
    #[instrument(skip_all, fields(project = %config.name(), path = %config.path().display()))]
    pub fn create_project(
        &self,
        config: &ProjectConfig,
        overwrite: bool,
    ) -> FastkitResult<ProjectCreation> {
        config.validate()?;

        let root = config.path();
        let cleanup = match self.inspect_target(root)? {
            TargetState::Empty => None,
            _ if !overwrite => {
                return Err(ApplicationError::ProjectExists {
                    path: root.to_path_buf(),
                }
                .into());
            }
            TargetState::GeneratedProject => Some(self.cleanup.cleanup_entire_project(root)),
            TargetState::Occupied => {
                debug!("Generating into an existing directory without wiping it");
                None
            }
        };

        let tree = self.scaffold_project_structure(config)?;
        Ok(ProjectCreation { cleanup, tree })
    }

    /// Lay out the full project for `config`, wire its services and sync
    /// the manifest. Failures are fatal and leave what was written so far.
    #[instrument(skip_all, fields(architecture = %config.architecture().kind()))]
    pub fn scaffold_project_structure(&self, config: &ProjectConfig) -> FastkitResult<GeneratedTree> {
        config.validate()?;

        let root = config.path();
        let ctx = project_context(config);
        let mut tree = GeneratedTree::new();
        self.materializer.ensure_dir(root, &mut tree)?;

        let service_roots: Vec<PathBuf> = match config.architecture() {
            ArchitectureConfig::SingleService => {
                self.write_service_tree(root, &ctx, &mut tree)?;
                vec![root.to_path_buf()]
            }
            ArchitectureConfig::Fullstack(frontend) => {
                let backend = root.join("backend");
                self.write_service_tree(&backend, &ctx, &mut tree)?;
                self.write_frontend(root, frontend, &ctx, &mut tree)?;
                vec![backend]
            }
            ArchitectureConfig::Microservices {
                services,
                include_gateway,
            } => self.write_microservices(root, services, *include_gateway, config, &mut tree)?,
            ArchitectureConfig::Onion { entities, cqrs } => {
                self.write_onion(root, entities, *cqrs, &ctx, &mut tree)?;
                Vec::new()
            }
        };

        self.place_all(root, layout::PROJECT_FILES, &ctx, &mut tree)?;
        if config.include_cicd() {
            self.place_all(root, layout::CICD_FILES, &ctx, &mut tree)?;
        }
        if config.include_docker() {
            self.place_all(root, layout::DOCKER_FILES, &ctx, &mut tree)?;
        }
        self.write_provider_summary(config, &ctx, &mut tree)?;

        for service_root in &service_roots {
            for (category, provider) in config.active_services() {
                let generated =
                    self.service_generator(category)?
                        .apply(service_root, provider, config.name())?;
                tree.extend(generated);
            }
        }

        self.deps
            .sync_for_services(&root.join(MANIFEST_FILE), &config.service_selections())?;

        info!(
            files = tree.file_count(),
            services = service_roots.len(),
            "Project structure generated"
        );
        Ok(tree)
    }

    /// README and, outside microservices, `docker-compose.yml`: the
    /// top-level files whose content follows the provider choices.
    fn write_provider_summary(
        &self,
        config: &ProjectConfig,
        ctx: &RenderContext,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<()> {
        let root = config.path();
        let (template, target) = layout::README;
        self.place(root, template, target, ctx, tree)?;
        if config.include_docker() && config.architecture().kind() != Architecture::Microservices {
            self.materializer.render_to(
                layout::COMPOSE_TEMPLATE,
                ctx,
                &root.join("docker-compose.yml"),
                tree,
            )?;
        }
        Ok(())
    }

    fn place(
        &self,
        root: &Path,
        template: &str,
        target: &str,
        ctx: &RenderContext,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<()> {
        let path = RelativePath::try_new(target)?.under(root);
        self.materializer.render_to(template, ctx, &path, tree)
    }

    fn place_all(
        &self,
        root: &Path,
        files: &[(&str, &str)],
        ctx: &RenderContext,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<()> {
        for (template, target) in files {
            self.place(root, template, target, ctx, tree)?;
        }
        Ok(())
    }

    fn write_service_tree(
        &self,
        service_root: &Path,
        ctx: &RenderContext,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<()> {
        for dir in layout::SERVICE_DIRECTORIES {
            self.materializer
                .ensure_dir(&RelativePath::try_new(dir)?.under(service_root), tree)?;
        }
        self.place_all(service_root, layout::SERVICE_FILES, ctx, tree)
    }

    fn write_frontend(
        &self,
        root: &Path,
        frontend: &FrontendConfig,
        ctx: &RenderContext,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<()> {
        let ctx = ctx
            .clone()
            .with_str("framework", frontend.framework.as_str())
            .with_str("build_tool", frontend.build_tool.as_str())
            .with_bool(
                "typescript",
                frontend.language == FrontendLanguage::TypeScript,
            )
            .with_str("entry", layout::frontend_entry(frontend));
        for Placement { template, target } in layout::frontend_layout(frontend) {
            self.place(root, template, &target, &ctx, tree)?;
        }
        Ok(())
    }

    fn write_microservices(
        &self,
        root: &Path,
        services: &[String],
        include_gateway: bool,
        config: &ProjectConfig,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<Vec<PathBuf>> {
        let services_dir = RelativePath::try_new("services")?;
        let mut roots = Vec::with_capacity(services.len());

        for (index, name) in services.iter().enumerate() {
            let service_root = services_dir.join(name)?.under(root);
            let ctx = project_context(config)
                .with_str("service_name", name.as_str())
                .with_str("service_title", to_pascal_case(name))
                .with_str("service_port", (8001 + index).to_string());
            self.write_service_tree(&service_root, &ctx, tree)?;
            roots.push(service_root);
        }

        let all_ctx = project_context(config)
            .with_list("services", services.iter().cloned())
            .with_bool("include_gateway", include_gateway);

        if include_gateway {
            let gateway_root = services_dir.join(GATEWAY_SERVICE)?.under(root);
            let gateway_ctx = all_ctx
                .clone()
                .with_str("service_name", GATEWAY_SERVICE)
                .with_str("service_title", "ApiGateway");
            self.write_service_tree(&gateway_root, &gateway_ctx, tree)?;
            self.materializer.render_to(
                layout::GATEWAY_MAIN_TEMPLATE,
                &gateway_ctx,
                &main_path(&gateway_root),
                tree,
            )?;
        }

        self.place_all(root, layout::SHARED_FILES, &all_ctx, tree)?;
        self.materializer.render_to(
            layout::MICROSERVICES_COMPOSE_TEMPLATE,
            &all_ctx,
            &root.join("docker-compose.yml"),
            tree,
        )?;
        Ok(roots)
    }

    fn write_onion(
        &self,
        root: &Path,
        entities: &[String],
        cqrs: bool,
        ctx: &RenderContext,
        tree: &mut GeneratedTree,
    ) -> FastkitResult<()> {
        let ctx = ctx
            .clone()
            .with_bool("cqrs", cqrs)
            .with_list("entities", entities.iter().cloned());

        for package in layout::onion_packages(cqrs) {
            self.place(
                root,
                layout::ONION_INIT_TEMPLATE,
                &format!("{package}/__init__.py"),
                &ctx,
                tree,
            )?;
        }
        for entity in entities {
            let entity_ctx = ctx
                .clone()
                .with_str("entity_name", entity.as_str())
                .with_str("entity_pascal", to_pascal_case(entity));
            self.place(
                root,
                layout::ONION_ENTITY_TEMPLATE,
                &format!("src/domain/entities/{entity}.py"),
                &entity_ctx,
                tree,
            )?;
        }
        if cqrs {
            self.place_all(root, layout::ONION_CQRS_TEMPLATES, &ctx, tree)?;
        }
        let (template, target) = layout::ONION_MAIN;
        self.place(root, template, target, &ctx, tree)?;
        self.place(root, "service/tests/__init__.py", "tests/__init__.py", &ctx, tree)
    }

    // ========================================================================
    // add-service
    // ========================================================================

    /// Add (or, with `force`, replace) a pluggable service in an existing
    /// project.
    #[instrument(skip_all, fields(project = %project.display(), category = %category, provider = provider))]
    pub fn add_service(
        &self,
        project: &Path,
        category: ServiceCategory,
        provider: &str,
        force: bool,
    ) -> FastkitResult<ServiceAddition> {
        capabilities::validate_service_combination(category, provider)?;
        self.ensure_service_project(project)?;

        let current = self.read_project_config(project)?;
        let updated = current.with_provider(category, provider)?;
        let generator = self.service_generator(category)?;
        let def = capabilities::service_def(category)?;

        let service_dir = project.join("app").join(def.directory);
        let cleanup = if self.fs().exists(&service_dir) {
            if !force {
                return Err(ApplicationError::ServiceExists {
                    category: category.to_string(),
                    path: service_dir,
                }
                .into());
            }
            Some(self.cleanup.cleanup_all_service_files(project, category))
        } else {
            None
        };

        let mut tree = generator.apply(project, provider, updated.name())?;
        self.write_provider_summary(&updated, &project_context(&updated), &mut tree)?;

        // Cleanup drops every package of the category, including ones shared
        // with other active services; all of them return here in category order.
        let manifest_changed = self
            .deps
            .resync_services(&project.join(MANIFEST_FILE), &updated.active_services())?;

        info!(files = tree.file_count(), manifest_changed, "Service added");
        Ok(ServiceAddition {
            cleanup,
            tree,
            manifest_changed,
        })
    }

    /// Whether the service directory for `category` already exists.
    pub fn service_exists(&self, project: &Path, category: ServiceCategory) -> bool {
        capabilities::find_service(category)
            .is_some_and(|def| self.fs().exists(&project.join("app").join(def.directory)))
    }

    // ========================================================================
    // add-domain
    // ========================================================================

    /// Scaffold a domain in an existing project.
    ///
    /// An existing domain directory is refused unless `force` is set.
    pub fn add_domain(
        &self,
        project: &Path,
        name: &str,
        with_tests: bool,
        force: bool,
    ) -> FastkitResult<GeneratedTree> {
        DomainValidator::validate_domain_name(name)?;
        self.ensure_service_project(project)?;

        if self.domain_exists(project, name) && !force {
            return Err(ApplicationError::DomainExists {
                name: name.to_string(),
                path: self.domain_dir(project, name),
            }
            .into());
        }

        let project_name = self.project_name(project);
        DomainGenerator::new(self.materializer.clone()).scaffold_domain(
            project,
            name,
            &project_name,
            with_tests,
            force,
        )
    }

    pub fn domain_exists(&self, project: &Path, name: &str) -> bool {
        self.fs().exists(&self.domain_dir(project, name))
    }

    fn domain_dir(&self, project: &Path, name: &str) -> PathBuf {
        project.join("app").join("domains").join(name)
    }
}

fn first_match<T: Copy>(table: &[(&str, T)], has: &impl Fn(&str) -> bool) -> Option<T> {
    table
        .iter()
        .find(|(pkg, _)| has(*pkg))
        .map(|(_, value)| *value)
}

/// Project names recovered from a manifest may not meet the creation rules.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        cleaned
    } else {
        format!("app_{cleaned}")
    }
}

/// Variables every project template can use.
fn project_context(config: &ProjectConfig) -> RenderContext {
    RenderContext::new(config.name())
        .with_str("architecture", config.architecture().kind().as_str())
        .with_str("database", config.database().as_str())
        .with_str("cache", config.cache().as_str())
        .with_str("auth", config.auth().as_str())
        .with_str("jobs", config.jobs().as_str())
        .with_bool("include_docker", config.include_docker())
        .with_bool("include_cicd", config.include_cicd())
        .with_str("service_name", config.name())
        .with_str("service_title", to_pascal_case(config.name()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateRenderer;
    use crate::application::services::fake_fs::FakeFs;
    use crate::domain::entities::project_config::HasName;
    use crate::domain::{DomainError, ProjectConfigBuilder};
    use crate::error::FastkitError;

    const PYPROJECT: &str = "[project]\nname = \"{{project_name}}\"\ndependencies = [\n    \"fastapi>=0.116\",\n]\n\n[tool.fastkit]\nproject = true\n";
    const CONFIG: &str = "import os\n\nclass Settings:\n    DEBUG: bool = False\n\n    class Config:\n        env_file = \".env\"\n";
    const MAIN: &str = "from fastapi import FastAPI\n\napp = FastAPI()\n";
    const README: &str = "# {{project_name}}\n| Database | {{database}} |\n| Cache | {{cache}} |\n";
    const COMPOSE: &str = "services:\n  db: {{database}}\n  cache: {{cache}}\n";

    /// Renders the files patching or provider choices affect; everything else is a stub.
    fn renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().returning(|id, ctx| {
            Ok(match id {
                "project/pyproject.toml" => ctx.render(PYPROJECT),
                "service/app/core/config.py" => CONFIG.to_string(),
                "service/app/main.py" => MAIN.to_string(),
                "project/README.md" => ctx.render(README),
                "project/docker-compose.yml" => ctx.render(COMPOSE),
                "services/auth/dependencies.py" => {
                    "# Authentication dependencies\ndef get_current_user():\n    ...\n".to_string()
                }
                other => format!("# {other}\n"),
            })
        });
        renderer.expect_has_template().returning(|_| true);
        renderer
    }

    fn orchestrator(fs: Arc<FakeFs>) -> ProjectOrchestrator {
        ProjectOrchestrator::new(fs, Arc::new(renderer()))
    }

    fn config(name: &str) -> ProjectConfigBuilder<HasName> {
        ProjectConfig::builder().name(name).path(format!("/w/{name}"))
    }

    // ========================================================================
    // scaffold_project_structure
    // ========================================================================

    #[test]
    fn single_service_wires_every_selected_service() {
        let fs = Arc::new(FakeFs::new());
        let cfg = config("shop")
            .database(DbProvider::Postgresql)
            .cache(CacheProvider::Redis)
            .auth(AuthProvider::Jwt)
            .build()
            .unwrap();

        let tree = orchestrator(fs.clone())
            .scaffold_project_structure(&cfg)
            .unwrap();

        assert!(tree.contains_file("/w/shop/app/db/postgresql_client.py"));
        assert!(tree.contains_file("/w/shop/app/cache/redis_client.py"));
        assert!(tree.contains_file("/w/shop/app/auth/jwt_provider.py"));
        assert!(!fs.exists(Path::new("/w/shop/app/jobs")));

        let config_py = fs.content("/w/shop/app/core/config.py").unwrap();
        assert!(config_py.contains("# Database settings"));
        assert!(config_py.contains("# Cache settings"));
        assert!(config_py.contains("# Authentication settings"));

        let manifest = fs.content("/w/shop/pyproject.toml").unwrap();
        for pkg in ["uvicorn[standard]", "pydantic>=", "pytest>=", "psycopg2-binary", "redis>="] {
            assert!(manifest.contains(pkg), "missing {pkg}");
        }
        assert!(fs
            .content("/w/shop/app/core/dependencies.py")
            .unwrap()
            .contains("get_current_user"));
    }

    #[test]
    fn toggles_control_cicd_and_docker() {
        let fs = Arc::new(FakeFs::new());
        let cfg = config("bare")
            .include_cicd(false)
            .include_docker(false)
            .build()
            .unwrap();
        orchestrator(fs.clone()).scaffold_project_structure(&cfg).unwrap();

        assert!(!fs.exists(Path::new("/w/bare/.github/workflows/ci.yml")));
        assert!(!fs.exists(Path::new("/w/bare/Dockerfile")));
        assert!(fs.exists(Path::new("/w/bare/README.md")));
    }

    #[test]
    fn fullstack_puts_services_under_backend() {
        let fs = Arc::new(FakeFs::new());
        let cfg = config("web")
            .architecture(ArchitectureConfig::Fullstack(FrontendConfig::default()))
            .cache(CacheProvider::InMemory)
            .build()
            .unwrap();
        orchestrator(fs.clone()).scaffold_project_structure(&cfg).unwrap();

        assert!(fs.exists(Path::new("/w/web/backend/app/main.py")));
        assert!(fs.exists(Path::new("/w/web/backend/app/cache/memory_client.py")));
        assert!(fs.exists(Path::new("/w/web/frontend/package.json")));
        assert!(fs.exists(Path::new("/w/web/pyproject.toml")));
    }

    #[test]
    fn microservices_skip_services_in_gateway() {
        let fs = Arc::new(FakeFs::new());
        let cfg = config("mesh")
            .architecture(ArchitectureConfig::Microservices {
                services: vec!["users".into(), "orders".into()],
                include_gateway: true,
            })
            .database(DbProvider::Sqlite)
            .build()
            .unwrap();
        orchestrator(fs.clone()).scaffold_project_structure(&cfg).unwrap();

        for service in ["users", "orders"] {
            let client = format!("/w/mesh/services/{service}/app/db/sqlite_client.py");
            assert!(fs.exists(Path::new(&client)), "missing {client}");
        }
        assert_eq!(
            fs.content("/w/mesh/services/api-gateway/app/main.py").as_deref(),
            Some("# microservices/gateway/main.py\n")
        );
        assert!(!fs.exists(Path::new("/w/mesh/services/api-gateway/app/db")));
        assert!(fs.exists(Path::new("/w/mesh/shared/models.py")));
        assert_eq!(
            fs.content("/w/mesh/docker-compose.yml").as_deref(),
            Some("# microservices/docker-compose.yml\n")
        );
    }

    #[test]
    fn onion_gets_dependencies_only() {
        let fs = Arc::new(FakeFs::new());
        let cfg = config("layers")
            .architecture(ArchitectureConfig::Onion {
                entities: vec!["order_line".into()],
                cqrs: true,
            })
            .database(DbProvider::Mongodb)
            .build()
            .unwrap();
        orchestrator(fs.clone()).scaffold_project_structure(&cfg).unwrap();

        assert!(fs.exists(Path::new("/w/layers/src/domain/entities/order_line.py")));
        assert!(fs.exists(Path::new("/w/layers/src/application/commands/__init__.py")));
        assert!(fs.exists(Path::new("/w/layers/src/presentation/api/main.py")));
        assert!(!fs.exists(Path::new("/w/layers/app")));
        assert!(fs
            .content("/w/layers/pyproject.toml")
            .unwrap()
            .contains("motor>=3.0.0"));
    }

    // ========================================================================
    // create_project
    // ========================================================================

    #[test]
    fn occupied_target_needs_overwrite() {
        let fs = Arc::new(FakeFs::new().with_file("/w/shop/notes.txt", "keep"));
        let cfg = config("shop").build().unwrap();
        let orch = orchestrator(fs.clone());

        let err = orch.create_project(&cfg, false).unwrap_err();
        assert!(matches!(
            err,
            FastkitError::Application(ApplicationError::ProjectExists { .. })
        ));

        let created = orch.create_project(&cfg, true).unwrap();
        assert!(created.cleanup.is_none());
        assert_eq!(fs.content("/w/shop/notes.txt").as_deref(), Some("keep"));
    }

    #[test]
    fn generated_target_is_wiped_first() {
        let fs = Arc::new(FakeFs::new());
        let orch = orchestrator(fs.clone());
        let first = config("shop").cache(CacheProvider::Redis).build().unwrap();
        orch.create_project(&first, false).unwrap();
        assert_eq!(
            orch.inspect_target(Path::new("/w/shop")).unwrap(),
            TargetState::GeneratedProject
        );

        let second = config("shop").build().unwrap();
        let created = orch.create_project(&second, true).unwrap();
        assert!(created.cleanup.is_some_and(|r| r.is_clean()));
        assert!(!fs.exists(Path::new("/w/shop/app/cache")));
        assert!(!fs.content("/w/shop/pyproject.toml").unwrap().contains("redis"));
    }

    // ========================================================================
    // add_service / add_domain
    // ========================================================================

    fn created(cfg: ProjectConfig) -> (Arc<FakeFs>, ProjectOrchestrator) {
        let fs = Arc::new(FakeFs::new());
        let orch = orchestrator(fs.clone());
        orch.create_project(&cfg, false).unwrap();
        (fs, orch)
    }

    #[test]
    fn invalid_combination_is_rejected_before_disk() {
        let (fs, orch) = created(config("shop").build().unwrap());
        let before = fs.file_paths();
        let err = orch
            .add_service(Path::new("/w/shop"), ServiceCategory::Cache, "oracle", false)
            .unwrap_err();
        assert!(matches!(
            err,
            FastkitError::Domain(DomainError::InvalidServiceCombination { .. })
        ));
        assert_eq!(fs.file_paths(), before);
    }

    #[test]
    fn non_project_is_rejected() {
        let fs = Arc::new(FakeFs::new().with_file("/w/other/pyproject.toml", "[project]\n"));
        let err = orchestrator(fs)
            .add_service(Path::new("/w/other"), ServiceCategory::Db, "sqlite", false)
            .unwrap_err();
        assert!(matches!(
            err,
            FastkitError::Application(ApplicationError::NotAGeneratedProject { .. })
        ));
    }

    #[test]
    fn replacing_cache_swaps_files_and_packages() {
        let (fs, orch) = created(config("shop").cache(CacheProvider::Redis).build().unwrap());
        let project = Path::new("/w/shop");

        let err = orch
            .add_service(project, ServiceCategory::Cache, "memcached", false)
            .unwrap_err();
        assert!(matches!(
            err,
            FastkitError::Application(ApplicationError::ServiceExists { .. })
        ));

        let added = orch
            .add_service(project, ServiceCategory::Cache, "memcached", true)
            .unwrap();
        assert!(added.cleanup.is_some());
        assert!(!fs.exists(Path::new("/w/shop/app/cache/redis_client.py")));
        assert!(fs.exists(Path::new("/w/shop/app/cache/memcached_client.py")));

        let manifest = fs.content("/w/shop/pyproject.toml").unwrap();
        assert!(!manifest.contains("redis>="));
        assert!(manifest.contains("pymemcache>=4.0.0"));
        let config_py = fs.content("/w/shop/app/core/config.py").unwrap();
        assert_eq!(config_py.matches("# Cache settings").count(), 1);
        assert!(!config_py.contains("REDIS_URL"));
    }

    #[test]
    fn replacing_jobs_keeps_redis_for_cache() {
        let (fs, orch) = created(
            config("shop")
                .cache(CacheProvider::Redis)
                .jobs(JobsProvider::Celery)
                .build()
                .unwrap(),
        );
        orch.add_service(Path::new("/w/shop"), ServiceCategory::Jobs, "apscheduler", true)
            .unwrap();
        let manifest = fs.content("/w/shop/pyproject.toml").unwrap();
        assert!(manifest.contains("redis>=4.0.0"));
        assert!(!manifest.contains("celery"));
        assert!(manifest.contains("apscheduler"));
    }

    fn assert_same_project(actual: &FakeFs, expected: &FakeFs) {
        assert_eq!(actual.file_paths(), expected.file_paths());
        for path in expected.file_paths() {
            assert_eq!(
                actual.content(&path),
                expected.content(&path),
                "{} differs",
                path.display()
            );
        }
    }

    #[test]
    fn replacing_a_provider_matches_a_fresh_project() {
        let (fs, orch) = created(
            config("shop")
                .database(DbProvider::Mysql)
                .cache(CacheProvider::Redis)
                .auth(AuthProvider::Jwt)
                .build()
                .unwrap(),
        );
        orch.add_service(Path::new("/w/shop"), ServiceCategory::Db, "postgresql", true)
            .unwrap();

        let (fresh, _) = created(
            config("shop")
                .database(DbProvider::Postgresql)
                .cache(CacheProvider::Redis)
                .auth(AuthProvider::Jwt)
                .build()
                .unwrap(),
        );
        assert_same_project(&fs, &fresh);
        assert!(fs
            .content("/w/shop/docker-compose.yml")
            .unwrap()
            .contains("db: postgresql"));
        assert!(fs
            .content("/w/shop/README.md")
            .unwrap()
            .contains("| Database | postgresql |"));
    }

    #[test]
    fn adding_a_first_provider_matches_a_fresh_project() {
        let (fs, orch) = created(
            config("shop")
                .database(DbProvider::Sqlite)
                .jobs(JobsProvider::Celery)
                .build()
                .unwrap(),
        );
        orch.add_service(Path::new("/w/shop"), ServiceCategory::Cache, "redis", false)
            .unwrap();

        let (fresh, _) = created(
            config("shop")
                .database(DbProvider::Sqlite)
                .cache(CacheProvider::Redis)
                .jobs(JobsProvider::Celery)
                .build()
                .unwrap(),
        );
        assert_same_project(&fs, &fresh);
    }

    #[test]
    fn add_service_leaves_compose_off_when_docker_was_off() {
        let (fs, orch) = created(
            config("shop")
                .include_docker(false)
                .include_cicd(false)
                .build()
                .unwrap(),
        );
        orch.add_service(Path::new("/w/shop"), ServiceCategory::Cache, "redis", false)
            .unwrap();

        assert!(!fs.exists(Path::new("/w/shop/docker-compose.yml")));
        let cfg = orch.read_project_config(Path::new("/w/shop")).unwrap();
        assert!(!cfg.include_docker());
        assert!(!cfg.include_cicd());
        assert!(fs.content("/w/shop/README.md").unwrap().contains("| Cache | redis |"));
    }

    #[test]
    fn read_project_config_recovers_providers() {
        let (_, orch) = created(
            config("shop")
                .database(DbProvider::Mysql)
                .auth(AuthProvider::OAuth)
                .jobs(JobsProvider::Rq)
                .build()
                .unwrap(),
        );
        let cfg = orch.read_project_config(Path::new("/w/shop")).unwrap();
        assert_eq!(cfg.name(), "shop");
        assert_eq!(cfg.database(), DbProvider::Mysql);
        assert_eq!(cfg.auth(), AuthProvider::OAuth);
        assert_eq!(cfg.jobs(), JobsProvider::Rq);
        assert_eq!(cfg.cache(), CacheProvider::None);
    }

    #[test]
    fn add_domain_refuses_existing_without_force() {
        let (fs, orch) = created(config("shop").build().unwrap());
        let project = Path::new("/w/shop");

        orch.add_domain(project, "orders", true, false).unwrap();
        assert!(fs.exists(Path::new("/w/shop/tests/domains/test_orders/test_models.py")));

        let err = orch.add_domain(project, "orders", true, false).unwrap_err();
        assert!(matches!(
            err,
            FastkitError::Application(ApplicationError::DomainExists { .. })
        ));
        assert!(orch.add_domain(project, "orders", false, true).is_ok());
    }

    #[test]
    fn sanitized_names_start_with_a_letter() {
        assert_eq!(sanitize_name("my shop"), "my_shop");
        assert_eq!(sanitize_name("1st"), "app_1st");
    }
}
