//! Implementation of the `fastkit add-domain` command.

use serde::Serialize;
use tracing::{info, instrument};

use fastkit_core::domain::DomainValidator;

use crate::{
    cli::AddDomainArgs,
    commands::local_orchestrator,
    config::AppConfig,
    error::{CliError, CliResult},
    output::{OutputManager, relative},
    prompt,
};

/// Execute `fastkit add-domain <NAME>`.
#[instrument(skip_all, fields(domain = %args.name))]
pub fn execute(args: AddDomainArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let name = args.name.trim().to_ascii_lowercase();
    DomainValidator::validate_domain_name(&name)?;
    let project = args.path.as_path();
    let with_tests = args.generate_tests();

    let orchestrator = local_orchestrator(&config)?;
    orchestrator.ensure_service_project(project)?;

    let force = args.force
        || (orchestrator.domain_exists(project, &name)
            && prompt::confirm(
                &format!("Domain '{name}' already exists. Overwrite it?"),
                false,
            )?);

    if output.is_interactive() {
        output.header("Summary")?;
        output.field("Domain", &name)?;
        output.field("Project", &project.display().to_string())?;
        output.field("With tests", &with_tests.to_string())?;
        output.print("")?;
        if !prompt::confirm("Proceed to create the domain?", true)? {
            return Err(CliError::Cancelled);
        }
    }

    let tree = orchestrator.add_domain(project, &name, with_tests, force)?;
    info!(files = tree.file_count(), "Domain added");

    output.tree(project, &tree)?;
    output.json(&DomainReport {
        command: "add-domain",
        domain: &name,
        with_tests,
        files: tree.files().map(|p| relative(project, p)).collect(),
    })?;
    output.success(&format!("Domain '{name}' created"))?;
    if !output.is_quiet() {
        output.print("")?;
        output.print("Register the router in app/main.py:")?;
        output.print(&format!(
            "  from app.domains.{name}.routes import router as {name}_router"
        ))?;
        output.print(&format!("  app.include_router({name}_router)"))?;
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct DomainReport<'a> {
    command: &'static str,
    domain: &'a str,
    with_tests: bool,
    files: Vec<String>,
}
