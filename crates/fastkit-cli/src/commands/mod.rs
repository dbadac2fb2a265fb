//! Command handlers. Each submodule translates parsed arguments into calls
//! on the core orchestrator and renders the result.

use std::sync::Arc;

use fastkit_adapters::{LocalFilesystem, MiniJinjaRenderer};
use fastkit_core::application::{ProjectOrchestrator, ports::Filesystem};

use crate::{config::AppConfig, error::CliResult};

pub mod add_domain;
pub mod add_service;
pub mod completions;
pub mod config;
pub mod create_project;

/// Orchestrator over `fs` with the embedded templates plus any overlay.
pub(crate) fn orchestrator_on(
    fs: Arc<dyn Filesystem>,
    config: &AppConfig,
) -> CliResult<ProjectOrchestrator> {
    let renderer = MiniJinjaRenderer::with_overlay(config.templates_dir())?;
    Ok(ProjectOrchestrator::new(fs, Arc::new(renderer)))
}

/// Orchestrator writing to the real filesystem.
pub(crate) fn local_orchestrator(config: &AppConfig) -> CliResult<ProjectOrchestrator> {
    orchestrator_on(Arc::new(LocalFilesystem::new()), config)
}
