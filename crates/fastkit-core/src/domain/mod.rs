// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for fastkit.
//!
//! Pure logic only: the capability registry, name validation, manifest and
//! source-file patching, and the value types the generators pass around.
//! All filesystem and templating concerns go through ports defined in the
//! application layer.
//!
//! - **No I/O**: patching and manifest editing are `&str -> String`
//! - **No tracing**: observability belongs to the application and CLI layers
//! - **Immutable entities**: `ProjectConfig` changes by producing a new value
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod manifest;
pub mod patching;
pub mod validation;
pub mod value_objects;

pub use entities::{
    ArchitectureConfig, CleanupFailure, CleanupReport, ContextValue, FrontendConfig, FsEntry,
    GeneratedTree, ProjectConfig, ProjectConfigBuilder, RelativePath, RenderContext,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{
    Architecture, AuthProvider, BuildTool, CacheProvider, DbProvider, FrontendFramework,
    FrontendLanguage, JobsProvider, ServiceCategory,
};

pub use validation::DomainValidator;
