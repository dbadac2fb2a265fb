//! Application layer for fastkit.
//!
//! This layer contains:
//! - **Services**: use case orchestration (ProjectOrchestrator and the sub-generators)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CleanupEngine, DependencyManager, DomainGenerator, Materializer, ProjectCreation,
    ProjectOrchestrator, ServiceAddition, ServiceGenerator, TargetState,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRenderer};

pub use error::ApplicationError;
