//! Domain value objects: architecture, service categories, providers and
//! frontend choices.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! They hold NO capability logic. Dependency lists, client templates and
//! settings live in `capabilities.rs`. This file's only job is to define the
//! types, their string representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Architecture ─────────────────────────────────────────────────────────────

/// Overall layout of a generated project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Architecture {
    #[default]
    #[serde(alias = "rest-apis")]
    SingleService,
    Fullstack,
    Microservices,
    #[serde(rename = "onion-architecture", alias = "onion")]
    Onion,
}

impl Architecture {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SingleService => "single-service",
            Self::Fullstack => "fullstack",
            Self::Microservices => "microservices",
            Self::Onion => "onion-architecture",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single-service" | "single" | "rest-apis" | "rest" => Ok(Self::SingleService),
            "fullstack" => Ok(Self::Fullstack),
            "microservices" => Ok(Self::Microservices),
            "onion-architecture" | "onion" => Ok(Self::Onion),
            other => Err(DomainError::UnknownChoice {
                kind: "architecture",
                value: other.into(),
                valid: &["single-service", "fullstack", "microservices", "onion-architecture"],
            }),
        }
    }
}

// ── ServiceCategory ──────────────────────────────────────────────────────────

/// A dependency category in the capability registry.
///
/// Only [`Db`](Self::Db), [`Cache`](Self::Cache), [`Auth`](Self::Auth) and
/// [`Jobs`](Self::Jobs) are pluggable services with their own generator; the
/// rest only contribute manifest entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Db,
    Cache,
    Auth,
    Jobs,
    Api,
    Testing,
    Validation,
    Serialization,
    Http,
    Tasks,
    Monitoring,
    Security,
    Files,
    Cloud,
    Messaging,
}

impl ServiceCategory {
    /// Categories that `add-service` accepts.
    pub const PLUGGABLE: &'static [Self] = &[Self::Db, Self::Cache, Self::Auth, Self::Jobs];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Cache => "cache",
            Self::Auth => "auth",
            Self::Jobs => "jobs",
            Self::Api => "api",
            Self::Testing => "testing",
            Self::Validation => "validation",
            Self::Serialization => "serialization",
            Self::Http => "http",
            Self::Tasks => "tasks",
            Self::Monitoring => "monitoring",
            Self::Security => "security",
            Self::Files => "files",
            Self::Cloud => "cloud",
            Self::Messaging => "messaging",
        }
    }

    pub const fn is_pluggable(self) -> bool {
        matches!(self, Self::Db | Self::Cache | Self::Auth | Self::Jobs)
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "db" | "database" => Ok(Self::Db),
            "cache" => Ok(Self::Cache),
            "auth" => Ok(Self::Auth),
            "jobs" => Ok(Self::Jobs),
            "api" => Ok(Self::Api),
            "testing" => Ok(Self::Testing),
            "validation" => Ok(Self::Validation),
            "serialization" => Ok(Self::Serialization),
            "http" => Ok(Self::Http),
            "tasks" => Ok(Self::Tasks),
            "monitoring" => Ok(Self::Monitoring),
            "security" => Ok(Self::Security),
            "files" => Ok(Self::Files),
            "cloud" => Ok(Self::Cloud),
            "messaging" => Ok(Self::Messaging),
            other => Err(DomainError::UnknownCategory(other.into())),
        }
    }
}

// ── Providers ────────────────────────────────────────────────────────────────

/// Authentication provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    None,
    Jwt,
    OAuth,
}

impl AuthProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Jwt => "jwt",
            Self::OAuth => "oauth",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "jwt" => Ok(Self::Jwt),
            "oauth" | "oauth2" => Ok(Self::OAuth),
            other => Err(DomainError::UnknownChoice {
                kind: "auth provider",
                value: other.into(),
                valid: &["none", "jwt", "oauth"],
            }),
        }
    }
}

/// Database provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbProvider {
    #[default]
    None,
    Postgresql,
    Mysql,
    Sqlite,
    Mongodb,
    Mssql,
}

impl DbProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Mongodb => "mongodb",
            Self::Mssql => "mssql",
        }
    }
}

impl FromStr for DbProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "postgresql" | "postgres" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            "sqlite" => Ok(Self::Sqlite),
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "mssql" => Ok(Self::Mssql),
            other => Err(DomainError::UnknownChoice {
                kind: "database provider",
                value: other.into(),
                valid: &["none", "postgresql", "mysql", "sqlite", "mongodb", "mssql"],
            }),
        }
    }
}

/// Cache provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheProvider {
    #[default]
    None,
    Redis,
    Memcached,
    InMemory,
    Dynamodb,
}

impl CacheProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Redis => "redis",
            Self::Memcached => "memcached",
            Self::InMemory => "in-memory",
            Self::Dynamodb => "dynamodb",
        }
    }
}

impl FromStr for CacheProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "redis" => Ok(Self::Redis),
            "memcached" => Ok(Self::Memcached),
            "in-memory" | "memory" => Ok(Self::InMemory),
            "dynamodb" => Ok(Self::Dynamodb),
            other => Err(DomainError::UnknownChoice {
                kind: "cache provider",
                value: other.into(),
                valid: &["none", "redis", "memcached", "in-memory", "dynamodb"],
            }),
        }
    }
}

/// Background job provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobsProvider {
    #[default]
    None,
    Celery,
    Rq,
    Dramatiq,
    Arq,
    Apscheduler,
}

impl JobsProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Celery => "celery",
            Self::Rq => "rq",
            Self::Dramatiq => "dramatiq",
            Self::Arq => "arq",
            Self::Apscheduler => "apscheduler",
        }
    }
}

impl FromStr for JobsProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "celery" => Ok(Self::Celery),
            "rq" => Ok(Self::Rq),
            "dramatiq" => Ok(Self::Dramatiq),
            "arq" => Ok(Self::Arq),
            "apscheduler" => Ok(Self::Apscheduler),
            other => Err(DomainError::UnknownChoice {
                kind: "jobs provider",
                value: other.into(),
                valid: &["none", "celery", "rq", "dramatiq", "arq", "apscheduler"],
            }),
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

impl_display_via_as_str!(
    AuthProvider,
    DbProvider,
    CacheProvider,
    JobsProvider,
    FrontendFramework,
    BuildTool,
    FrontendLanguage,
);

// ── Frontend ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontendFramework {
    #[default]
    React,
    Vue,
    Svelte,
}

impl FrontendFramework {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
        }
    }
}

impl FromStr for FrontendFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "react" => Ok(Self::React),
            "vue" => Ok(Self::Vue),
            "svelte" => Ok(Self::Svelte),
            other => Err(DomainError::UnknownChoice {
                kind: "frontend framework",
                value: other.into(),
                valid: &["react", "vue", "svelte"],
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    #[default]
    Vite,
    Webpack,
}

impl BuildTool {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vite => "vite",
            Self::Webpack => "webpack",
        }
    }
}

impl FromStr for BuildTool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vite" => Ok(Self::Vite),
            "webpack" => Ok(Self::Webpack),
            other => Err(DomainError::UnknownChoice {
                kind: "build tool",
                value: other.into(),
                valid: &["vite", "webpack"],
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontendLanguage {
    #[default]
    TypeScript,
    JavaScript,
}

impl FrontendLanguage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
        }
    }

    /// Script extension used for entrypoints and build configs.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::TypeScript => "ts",
            Self::JavaScript => "js",
        }
    }
}

impl FromStr for FrontendLanguage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(Self::TypeScript),
            "javascript" | "js" => Ok(Self::JavaScript),
            other => Err(DomainError::UnknownChoice {
                kind: "frontend language",
                value: other.into(),
                valid: &["ts", "js"],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_aliases() {
        assert_eq!("rest-apis".parse::<Architecture>().unwrap(), Architecture::SingleService);
        assert_eq!("onion".parse::<Architecture>().unwrap(), Architecture::Onion);
        assert_eq!(Architecture::Onion.to_string(), "onion-architecture");
        assert!("mvc".parse::<Architecture>().is_err());
    }

    #[test]
    fn category_parsing() {
        assert_eq!("database".parse::<ServiceCategory>().unwrap(), ServiceCategory::Db);
        assert!(ServiceCategory::Jobs.is_pluggable());
        assert!(!ServiceCategory::Monitoring.is_pluggable());
        assert!(matches!(
            "queue".parse::<ServiceCategory>(),
            Err(DomainError::UnknownCategory(_))
        ));
    }

    #[test]
    fn providers_round_trip_through_strings() {
        for p in ["none", "redis", "memcached", "in-memory", "dynamodb"] {
            assert_eq!(p.parse::<CacheProvider>().unwrap().as_str(), p);
        }
        assert_eq!("oauth2".parse::<AuthProvider>().unwrap(), AuthProvider::OAuth);
        assert!("oracle".parse::<DbProvider>().is_err());
    }

    #[test]
    fn frontend_language_extension() {
        assert_eq!("ts".parse::<FrontendLanguage>().unwrap().extension(), "ts");
        assert_eq!(FrontendLanguage::JavaScript.extension(), "js");
    }
}
