// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid domain name '{name}': {reason}")]
    InvalidDomainName { name: String, reason: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid service name '{name}': {reason}")]
    InvalidServiceName { name: String, reason: String },

    #[error("Invalid entity name '{name}': {reason}")]
    InvalidEntityName { name: String, reason: String },

    #[error("Duplicate service name: {name}")]
    DuplicateService { name: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes its root: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("Unknown service type '{0}'")]
    UnknownCategory(String),

    #[error("'{category}' cannot be added as a service")]
    CategoryNotPluggable { category: String },

    #[error("Invalid provider '{provider}' for service '{category}'")]
    InvalidServiceCombination {
        category: String,
        provider: String,
        valid: Vec<&'static str>,
    },

    #[error("Unknown {kind} '{value}'")]
    UnknownChoice {
        kind: &'static str,
        value: String,
        valid: &'static [&'static str],
    },

    // ========================================================================
    // Manifest
    // ========================================================================
    #[error("Manifest cannot be parsed: {reason}")]
    ManifestParse { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDomainName { .. } => vec![
                "Domain names start with a lowercase letter".into(),
                "Use only lowercase letters, digits and underscores (max 50)".into(),
                "Examples: users, order_items, products".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Start the name with a letter".into(),
                "Use letters, digits, hyphens and underscores".into(),
                "Examples: my-api, shop_backend".into(),
            ],
            Self::InvalidServiceName { .. } => vec![
                "Service names are lowercase, e.g. orders or billing-api".into(),
                "'api-gateway' is reserved when the gateway is enabled".into(),
            ],
            Self::InvalidEntityName { .. } => vec![
                "Entity names must be valid Python module names, e.g. order".into(),
            ],
            Self::DuplicateService { name } => {
                vec![format!("'{name}' was given more than once; drop the duplicate")]
            }
            Self::UnknownCategory(_) | Self::CategoryNotPluggable { .. } => {
                vec!["Available service types: db, cache, auth, jobs".into()]
            }
            Self::InvalidServiceCombination {
                category, valid, ..
            } => vec![
                format!("Valid providers for {category}: {}", valid.join(", ")),
                format!("Example: fastkit add-service {category} {}", valid.first().copied().unwrap_or("none")),
            ],
            Self::UnknownChoice { kind, valid, .. } => {
                vec![format!("Valid {kind} values: {}", valid.join(", "))]
            }
            Self::ManifestParse { .. } => vec![
                "pyproject.toml needs a 'dependencies = [' array closed by ']'".into(),
                "The manifest was left unchanged".into(),
            ],
            _ => vec!["See `fastkit --help` for valid values".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownCategory(_)
            | Self::CategoryNotPluggable { .. }
            | Self::InvalidServiceCombination { .. }
            | Self::UnknownChoice { .. } => ErrorCategory::Compatibility,
            Self::ManifestParse { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Internal,
}
