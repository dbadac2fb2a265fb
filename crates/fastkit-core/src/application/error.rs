//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! rules. Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while generating or editing a project.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No template is registered under this id.
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    /// The template exists but failed to render.
    #[error("Rendering '{template}' failed: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// A file the operation needs is missing.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// In-memory store lock was poisoned.
    #[error("Filesystem store lock poisoned")]
    StoreLockError,

    /// The directory does not hold a project generated by this tool.
    #[error("{path} is not a fastkit project: {reason}")]
    NotAGeneratedProject { path: PathBuf, reason: String },

    /// Target directory is not empty.
    #[error("Directory {path} is not empty")]
    ProjectExists { path: PathBuf },

    /// The service directory is already present.
    #[error("Service '{category}' already exists at {path}")]
    ServiceExists { category: String, path: PathBuf },

    /// The domain directory is already present.
    #[error("Domain '{name}' already exists at {path}")]
    DomainExists { name: String, path: PathBuf },
}

impl ApplicationError {
    pub(crate) fn fs(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { id } => vec![
                format!("No embedded or overlay template provides '{id}'"),
                "Check FASTKIT_TEMPLATES_DIR / templates.local_path if you override templates"
                    .into(),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Inspect the template '{template}' for syntax errors"),
            ],
            Self::FileNotFound { path } => vec![
                format!("Expected file is missing: {}", path.display()),
                "Run the command from the project root or pass --path".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreLockError => vec!["Retry the operation".into()],
            Self::NotAGeneratedProject { .. } => vec![
                "Run this inside a project created with `fastkit create-project`".into(),
                "The project needs pyproject.toml with a [tool.fastkit] table, app/core and app/main.py".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to generate into it anyway".into(),
                "Choose a different project name".into(),
            ],
            Self::ServiceExists { category, .. } => vec![
                format!("Use --force to replace the existing {category} service"),
            ],
            Self::DomainExists { name, .. } => vec![
                format!("Use --force to overwrite the '{name}' domain files"),
                "Existing files are otherwise kept".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } | Self::FileNotFound { .. } => ErrorCategory::NotFound,
            Self::NotAGeneratedProject { .. }
            | Self::ProjectExists { .. }
            | Self::ServiceExists { .. }
            | Self::DomainExists { .. } => ErrorCategory::Validation,
            Self::RenderingFailed { .. } | Self::FilesystemError { .. } | Self::StoreLockError => {
                ErrorCategory::Internal
            }
        }
    }
}
