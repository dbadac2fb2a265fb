//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `FASTKIT_<SECTION>__<KEY>`
//!    (e.g. `FASTKIT_DEFAULTS__DATABASE=postgresql`); `.env` is loaded
//!    into the environment by `main` beforehand
//! 3. Config file (`--config FILE`, else [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "FASTKIT";

/// Every key `config get` / `config set` understand.
pub const KNOWN_KEYS: &[&str] = &[
    "defaults.architecture",
    "defaults.database",
    "defaults.cache",
    "defaults.auth",
    "defaults.jobs",
    "defaults.include_docker",
    "defaults.include_cicd",
    "output.no_color",
    "output.format",
    "templates.local_path",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default choices for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

/// Seeds for `create-project`; unset entries fall back to the core defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub architecture: Option<String>,
    pub database: Option<String>,
    pub cache: Option<String>,
    pub auth: Option<String>,
    pub jobs: Option<String>,
    pub include_docker: bool,
    pub include_cicd: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            architecture: None,
            database: None,
            cache: None,
            auth: None,
            jobs: None,
            include_docker: true,
            include_cicd: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`. Used when `--output-format` is `auto`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose files override or extend the embedded templates.
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicit `--config` file must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| config_error("failed to seed built-in defaults", e))?;

        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| config_error("failed to load configuration", e))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.fastkit.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "fastkit", "fastkit")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".fastkit.toml"))
    }

    /// Value of a dotted key as displayed by `config get`. Unset optional
    /// values render as an empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let value = match key {
            "defaults.architecture" => opt(&self.defaults.architecture),
            "defaults.database" => opt(&self.defaults.database),
            "defaults.cache" => opt(&self.defaults.cache),
            "defaults.auth" => opt(&self.defaults.auth),
            "defaults.jobs" => opt(&self.defaults.jobs),
            "defaults.include_docker" => self.defaults.include_docker.to_string(),
            "defaults.include_cicd" => self.defaults.include_cicd.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            "templates.local_path" => self
                .templates
                .local_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }

    /// Overlay directory for the template renderer, if configured.
    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates.local_path.as_deref()
    }
}

fn config_error(message: &str, source: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: format!("{message}: {source}"),
        source: Some(Box::new(source)),
    }
}
