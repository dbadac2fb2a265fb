//! The single error type returned across the core's public API.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FastkitError {
    /// A name, choice or combination was rejected before any I/O.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Generation or patching failed against the target directory.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl FastkitError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Compatibility => ErrorCategory::Compatibility,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }
}

/// Coarse grouping used by front ends to pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}

pub type FastkitResult<T> = Result<T, FastkitError>;
