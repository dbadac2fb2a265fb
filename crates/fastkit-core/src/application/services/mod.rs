//! Application services - orchestrate use cases.
//!
//! The orchestrator drives the sub-generators; everything writes through the
//! [`Materializer`] and edits shared files through `domain::patching`.

pub mod cleanup;
pub mod dependency_manager;
pub mod domain_generator;
pub mod layout;
pub mod materializer;
pub mod project_orchestrator;
pub mod service_generator;

#[cfg(test)]
pub(crate) mod fake_fs;

pub use cleanup::CleanupEngine;
pub use dependency_manager::DependencyManager;
pub use domain_generator::DomainGenerator;
pub use materializer::Materializer;
pub use project_orchestrator::{ProjectCreation, ProjectOrchestrator, ServiceAddition, TargetState};
pub use service_generator::ServiceGenerator;
