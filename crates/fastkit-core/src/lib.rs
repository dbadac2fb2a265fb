//! Generation engine behind the `fastkit` command.
//!
//! `domain` holds the pure parts: validated names and provider choices, the
//! capability registry, file trees and the text patches applied to existing
//! projects. `application` wires those to two ports, [`Filesystem`] and
//! [`TemplateRenderer`], whose implementations live in `fastkit-adapters`.
//!
//! [`Filesystem`]: application::ports::Filesystem
//! [`TemplateRenderer`]: application::ports::TemplateRenderer
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fastkit_core::prelude::*;
//!
//! # fn demo(fs: Arc<dyn Filesystem>, renderer: Arc<dyn TemplateRenderer>) -> FastkitResult<()> {
//! // 1. Describe the project
//! let config = ProjectConfig::builder()
//!     .name("shop")
//!     .database(DbProvider::Postgresql)
//!     .cache(CacheProvider::Redis)
//!     .build()?;
//!
//! // 2. Run the use case with injected adapters
//! let orchestrator = ProjectOrchestrator::new(fs, renderer);
//! orchestrator.create_project(&config, false)?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        ProjectOrchestrator,
        ports::{Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        Architecture, ArchitectureConfig, AuthProvider, BuildTool, CacheProvider, CleanupReport,
        DbProvider, FrontendConfig, FrontendFramework, FrontendLanguage, GeneratedTree,
        JobsProvider, ProjectConfig, RenderContext, ServiceCategory,
    };
    pub use crate::error::{FastkitError, FastkitResult};
}
