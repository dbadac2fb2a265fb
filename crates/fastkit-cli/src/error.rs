//! CLI error type, exit codes and terminal rendering.
//!
//! Every failure that reaches `main` is a [`CliError`]. Core errors pass
//! through unchanged and keep their own suggestions; the CLI only adds the
//! failures that belong to the binary itself (config files, prompts, I/O
//! on stdout).

use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use fastkit_core::{domain::DomainError, error::FastkitError};

use fastkit_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

type BoxedSource = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The create-project target has content and overwriting was declined.
    #[error("Directory {path} is not empty")]
    ProjectExists { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Unknown config key '{key}'")]
    UnknownConfigKey {
        key: String,
        known: &'static [&'static str],
    },

    #[error(transparent)]
    Core(#[from] FastkitError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A "Proceed?" prompt was answered with no.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Failed to serialise output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        CliError::Core(err.into())
    }
}

/// How a failure is classified for exit codes and log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input, an incompatible choice or a declined prompt.
    UserError,
    NotFound,
    Configuration,
    Internal,
}

impl From<CoreCategory> for ErrorCategory {
    fn from(category: CoreCategory) -> Self {
        match category {
            CoreCategory::Validation | CoreCategory::Compatibility => Self::UserError,
            CoreCategory::NotFound => Self::NotFound,
            CoreCategory::Internal => Self::Internal,
        }
    }
}

impl ErrorCategory {
    /// `2` is never returned here; clap owns it for parse errors.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::UserError | Self::Internal => 1,
            Self::NotFound => 3,
            Self::Configuration => 4,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectExists { path } => vec![
                format!("'{}' already has files in it", path.display()),
                "Pass --force to generate anyway (a previous fastkit project is wiped first)"
                    .into(),
                "Or pick another NAME / --path".into(),
            ],
            Self::ConfigError { .. } => vec![
                "`fastkit config path` shows where the config file is read from".into(),
                "Environment overrides look like FASTKIT_DEFAULTS__DATABASE=postgresql".into(),
            ],
            Self::UnknownConfigKey { known, .. } => std::iter::once("Known keys:".to_string())
                .chain(known.iter().map(|k| format!("  • {k}")))
                .collect(),
            Self::Core(core) => core.suggestions(),
            Self::IoError { .. } => vec![
                "Check that the directory exists and is writable".into(),
            ],
            Self::Cancelled => vec!["Nothing was written".into()],
            Self::Serialization(_) => vec!["Retry with --output-format human".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectExists { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } | Self::UnknownConfigKey { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(core) => core.category().into(),
            Self::IoError { .. } | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Error report for a colour terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Error report without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, styled: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if styled { style(text) } else { text.to_string() }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n{} {}",
            paint("Error:", |s| s.red().bold().to_string()),
            paint(&self.to_string(), |s| s.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let _ = writeln!(
                    out,
                    "  {}",
                    paint(&format!("Caused by: {err}"), |s| s.dimmed().to_string())
                );
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Suggestions:", |s| s.yellow().bold().to_string())
            );
            for suggestion in &suggestions {
                let _ = writeln!(out, "  {suggestion}");
            }
        }

        if !verbose {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Use -v / --verbose for more details.", |s| s
                    .dimmed()
                    .to_string())
            );
        }

        out
    }

    /// Emit the failure as a tracing event; user errors are only warnings.
    pub fn log(&self) {
        let category = self.category();
        let code = category.exit_code();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, exit_code = code, "{}", self);
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, exit_code = code, "{}", self);
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(cause = %source, "error source");
        }
    }
}

// ── IntoCli ───────────────────────────────────────────────────────────────────

/// Attach a message to an I/O failure at the call site.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| CliError::IoError {
            message: f().into(),
            source,
        })
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
