//! Implementation of the `fastkit add-service` command.

use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument};

use fastkit_core::{
    application::ServiceAddition,
    domain::{ServiceCategory, capabilities},
};

use crate::{
    cli::AddServiceArgs,
    commands::local_orchestrator,
    config::AppConfig,
    error::{CliError, CliResult},
    output::{OutputManager, relative},
    prompt,
};

/// Execute `fastkit add-service <TYPE> <PROVIDER>`.
///
/// The pair is checked against the provider registry before the project is
/// looked at. An existing service of the same type is replaced only after
/// confirmation or with `--force`.
#[instrument(skip_all, fields(category = %args.category, provider = %args.provider))]
pub fn execute(args: AddServiceArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let (category, provider) = parse_selection(&args.category, &args.provider)?;
    let project = args.path.as_path();

    let orchestrator = local_orchestrator(&config)?;
    orchestrator.ensure_service_project(project)?;

    let exists = orchestrator.service_exists(project, category);
    let force = args.force
        || (exists
            && prompt::confirm(
                &format!("Service '{category}' already exists. Replace it with '{provider}'?"),
                false,
            )?);

    if output.is_interactive() {
        output.header("Summary")?;
        output.field("Service", category.as_str())?;
        output.field("Provider", &provider)?;
        output.field("Project", &project.display().to_string())?;
        output.field("Replaces", &(exists && force).to_string())?;
        output.print("")?;
        if !prompt::confirm("Proceed to add the service?", true)? {
            return Err(CliError::Cancelled);
        }
    }

    let spinner = output.spinner(&format!("Adding {category} service ({provider})"));
    let result = orchestrator.add_service(project, category, &provider, force);
    spinner.finish_and_clear();
    let addition = result?;

    info!(
        files = addition.tree.file_count(),
        manifest_changed = addition.manifest_changed,
        "Service added"
    );

    if let Some(report) = &addition.cleanup {
        output.cleanup_report(project, report)?;
    }
    output.tree(project, &addition.tree)?;
    output.json(&ServiceReport::new(project, category, &provider, &addition))?;
    output.success(&format!("Added {category} service '{provider}'"))?;
    if addition.manifest_changed {
        output.info("pyproject.toml dependencies updated; reinstall with `pip install -e .`")?;
    }

    Ok(())
}

/// Parse and registry-check a `(type, provider)` pair.
fn parse_selection(category: &str, provider: &str) -> CliResult<(ServiceCategory, String)> {
    let category: ServiceCategory = category.trim().parse()?;
    let provider = provider.trim().to_ascii_lowercase();
    capabilities::validate_service_combination(category, &provider)?;
    Ok((category, provider))
}

#[derive(Debug, Serialize)]
struct ServiceReport<'a> {
    command: &'static str,
    category: ServiceCategory,
    provider: &'a str,
    files: Vec<String>,
    manifest_changed: bool,
    replaced: bool,
    cleanup_failures: usize,
}

impl<'a> ServiceReport<'a> {
    fn new(
        project: &Path,
        category: ServiceCategory,
        provider: &'a str,
        addition: &ServiceAddition,
    ) -> Self {
        Self {
            command: "add-service",
            category,
            provider,
            files: addition.tree.files().map(|p| relative(project, p)).collect(),
            manifest_changed: addition.manifest_changed,
            replaced: addition.cleanup.is_some(),
            cleanup_failures: addition
                .cleanup
                .as_ref()
                .map_or(0, |report| report.failures.len()),
        }
    }
}
