//! The `ProjectConfig` aggregate and its typestate builder.
//!
//! A `ProjectConfig` is the validated set of choices for one run. Names are
//! checked at `build()`; once a config exists it is immutable, and
//! add-service derives a new one through [`ProjectConfig::with_provider`].

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    validation::DomainValidator,
    value_objects::{
        Architecture, AuthProvider, BuildTool, CacheProvider, DbProvider, FrontendFramework,
        FrontendLanguage, JobsProvider, ServiceCategory,
    },
};

// ── Architecture sub-configuration ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrontendConfig {
    pub framework: FrontendFramework,
    pub build_tool: BuildTool,
    pub language: FrontendLanguage,
}

/// Architecture style together with the options only it understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "style", rename_all = "kebab-case")]
pub enum ArchitectureConfig {
    SingleService,
    Fullstack(FrontendConfig),
    Microservices {
        services: Vec<String>,
        include_gateway: bool,
    },
    #[serde(rename = "onion-architecture")]
    Onion { entities: Vec<String>, cqrs: bool },
}

impl ArchitectureConfig {
    pub const fn kind(&self) -> Architecture {
        match self {
            Self::SingleService => Architecture::SingleService,
            Self::Fullstack(_) => Architecture::Fullstack,
            Self::Microservices { .. } => Architecture::Microservices,
            Self::Onion { .. } => Architecture::Onion,
        }
    }
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self::SingleService
    }
}

// ── Aggregate root ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectConfig {
    name: String,
    path: PathBuf,
    architecture: ArchitectureConfig,
    auth: AuthProvider,
    database: DbProvider,
    cache: CacheProvider,
    jobs: JobsProvider,
    include_cicd: bool,
    include_docker: bool,
}

/// Selections every generated project declares regardless of choices.
const BASELINE_SELECTIONS: &[(ServiceCategory, &str)] = &[
    (ServiceCategory::Api, "rest"),
    (ServiceCategory::Validation, "pydantic"),
    (ServiceCategory::Testing, "pytest"),
];

impl ProjectConfig {
    pub fn builder() -> ProjectConfigBuilder<NoName> {
        ProjectConfigBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    /// Project root; every generated path lives below it.
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn architecture(&self) -> &ArchitectureConfig {
        &self.architecture
    }
    pub const fn auth(&self) -> AuthProvider {
        self.auth
    }
    pub const fn database(&self) -> DbProvider {
        self.database
    }
    pub const fn cache(&self) -> CacheProvider {
        self.cache
    }
    pub const fn jobs(&self) -> JobsProvider {
        self.jobs
    }
    pub const fn include_cicd(&self) -> bool {
        self.include_cicd
    }
    pub const fn include_docker(&self) -> bool {
        self.include_docker
    }

    /// Provider chosen for a pluggable category; `"none"` for the rest.
    pub fn provider(&self, category: ServiceCategory) -> &'static str {
        match category {
            ServiceCategory::Db => self.database.as_str(),
            ServiceCategory::Cache => self.cache.as_str(),
            ServiceCategory::Auth => self.auth.as_str(),
            ServiceCategory::Jobs => self.jobs.as_str(),
            _ => "none",
        }
    }

    /// Pluggable services that are switched on, in db/cache/auth/jobs order.
    pub fn active_services(&self) -> Vec<(ServiceCategory, &'static str)> {
        ServiceCategory::PLUGGABLE
            .iter()
            .map(|&c| (c, self.provider(c)))
            .filter(|(_, p)| *p != "none")
            .collect()
    }

    /// Every `(category, provider)` pair whose dependencies the manifest needs.
    pub fn service_selections(&self) -> Vec<(ServiceCategory, &'static str)> {
        let mut selections: Vec<_> = BASELINE_SELECTIONS.to_vec();
        selections.extend(self.active_services());
        selections
    }

    /// Same config with one pluggable provider replaced.
    pub fn with_provider(
        &self,
        category: ServiceCategory,
        provider: &str,
    ) -> Result<Self, DomainError> {
        let mut next = self.clone();
        match category {
            ServiceCategory::Db => next.database = provider.parse()?,
            ServiceCategory::Cache => next.cache = provider.parse()?,
            ServiceCategory::Auth => next.auth = provider.parse()?,
            ServiceCategory::Jobs => next.jobs = provider.parse()?,
            other => {
                return Err(DomainError::CategoryNotPluggable {
                    category: other.to_string(),
                })
            }
        }
        Ok(next)
    }

    /// Same config rooted somewhere else.
    pub fn at(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        DomainValidator::validate_project_name(&self.name)?;
        match &self.architecture {
            ArchitectureConfig::Microservices {
                services,
                include_gateway,
            } => DomainValidator::validate_service_names(services, *include_gateway),
            ArchitectureConfig::Onion { entities, .. } => entities
                .iter()
                .try_for_each(|e| DomainValidator::validate_entity_name(e)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.architecture.kind())?;
        let active = self.active_services();
        if !active.is_empty() {
            let parts: Vec<String> = active.iter().map(|(c, p)| format!("{c}={p}")).collect();
            write!(f, " [{}]", parts.join(", "))?;
        }
        Ok(())
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: name has not been set.
pub struct NoName;
/// Marker: name has been set.
pub struct HasName;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`ProjectConfig`].
///
/// Everything except the name has a default: single-service, no pluggable
/// services, CI and Docker on.
pub struct ProjectConfigBuilder<N> {
    name: Option<String>,
    path: Option<PathBuf>,
    architecture: ArchitectureConfig,
    auth: AuthProvider,
    database: DbProvider,
    cache: CacheProvider,
    jobs: JobsProvider,
    include_cicd: bool,
    include_docker: bool,
    _marker: PhantomData<N>,
}

impl ProjectConfigBuilder<NoName> {
    fn new() -> Self {
        Self {
            name: None,
            path: None,
            architecture: ArchitectureConfig::default(),
            auth: AuthProvider::None,
            database: DbProvider::None,
            cache: CacheProvider::None,
            jobs: JobsProvider::None,
            include_cicd: true,
            include_docker: true,
            _marker: PhantomData,
        }
    }

    pub fn name(self, name: impl Into<String>) -> ProjectConfigBuilder<HasName> {
        ProjectConfigBuilder {
            name: Some(name.into()),
            path: self.path,
            architecture: self.architecture,
            auth: self.auth,
            database: self.database,
            cache: self.cache,
            jobs: self.jobs,
            include_cicd: self.include_cicd,
            include_docker: self.include_docker,
            _marker: PhantomData,
        }
    }
}

impl ProjectConfigBuilder<HasName> {
    /// Project root directory. Defaults to `./<name>`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn architecture(mut self, architecture: ArchitectureConfig) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    pub fn database(mut self, database: DbProvider) -> Self {
        self.database = database;
        self
    }

    pub fn cache(mut self, cache: CacheProvider) -> Self {
        self.cache = cache;
        self
    }

    pub fn jobs(mut self, jobs: JobsProvider) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn include_cicd(mut self, on: bool) -> Self {
        self.include_cicd = on;
        self
    }

    pub fn include_docker(mut self, on: bool) -> Self {
        self.include_docker = on;
        self
    }

    pub fn build(self) -> Result<ProjectConfig, DomainError> {
        let name = self.name.unwrap_or_default();
        let path = self.path.unwrap_or_else(|| PathBuf::from(&name));
        let config = ProjectConfig {
            name,
            path,
            architecture: self.architecture,
            auth: self.auth,
            database: self.database,
            cache: self.cache,
            jobs: self.jobs,
            include_cicd: self.include_cicd,
            include_docker: self.include_docker,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ProjectConfigBuilder<HasName> {
        ProjectConfig::builder().name("shop-api").path("/work/shop-api")
    }

    #[test]
    fn defaults() {
        let config = base().build().unwrap();
        assert_eq!(config.architecture().kind(), Architecture::SingleService);
        assert!(config.active_services().is_empty());
        assert!(config.include_cicd() && config.include_docker());
        assert_eq!(config.path(), Path::new("/work/shop-api"));
    }

    #[test]
    fn selections_include_baseline_and_active_services() {
        let config = base()
            .database(DbProvider::Postgresql)
            .cache(CacheProvider::Redis)
            .build()
            .unwrap();
        assert_eq!(
            config.service_selections(),
            vec![
                (ServiceCategory::Api, "rest"),
                (ServiceCategory::Validation, "pydantic"),
                (ServiceCategory::Testing, "pytest"),
                (ServiceCategory::Db, "postgresql"),
                (ServiceCategory::Cache, "redis"),
            ]
        );
    }

    #[test]
    fn with_provider_replaces_one_choice() {
        let config = base().cache(CacheProvider::Redis).build().unwrap();
        let next = config
            .with_provider(ServiceCategory::Cache, "memcached")
            .unwrap();
        assert_eq!(next.cache(), CacheProvider::Memcached);
        assert_eq!(config.cache(), CacheProvider::Redis);
        assert!(config.with_provider(ServiceCategory::Http, "httpx").is_err());
        assert!(config.with_provider(ServiceCategory::Cache, "mongo").is_err());
    }

    #[test]
    fn build_rejects_bad_names() {
        assert!(ProjectConfig::builder().name("").build().is_err());
        let dup = base()
            .architecture(ArchitectureConfig::Microservices {
                services: vec!["orders".into(), "orders".into()],
                include_gateway: true,
            })
            .build();
        assert!(matches!(dup, Err(DomainError::DuplicateService { .. })));

        let entity = base()
            .architecture(ArchitectureConfig::Onion {
                entities: vec!["Bad Name".into()],
                cqrs: false,
            })
            .build();
        assert!(matches!(entity, Err(DomainError::InvalidEntityName { .. })));
    }

    #[test]
    fn display_lists_active_services() {
        let config = base().auth(AuthProvider::Jwt).build().unwrap();
        assert_eq!(config.to_string(), "shop-api (single-service) [auth=jwt]");
    }
}
