//! Implementation of the `fastkit create-project` command.
//!
//! Responsibility: translate CLI arguments into a `ProjectConfig`, guard the
//! target directory, call the orchestrator and display results. No
//! generation logic lives here.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use fastkit_adapters::MemoryFilesystem;
use fastkit_core::{
    application::TargetState,
    domain::{
        Architecture as CoreArch, ArchitectureConfig, BuildTool, CleanupReport, DomainError,
        FrontendConfig, FrontendFramework, FrontendLanguage, GeneratedTree, ProjectConfig,
    },
};

use crate::{
    cli::{Architecture, BuildToolArg, CreateProjectArgs, FrontendArg, FrontendLangArg},
    commands::{local_orchestrator, orchestrator_on},
    config::AppConfig,
    error::{CliError, CliResult},
    output::{OutputManager, relative},
    prompt,
};

/// Suggested name when none is given.
const DEFAULT_PROJECT_NAME: &str = "my-fastapi-app";

/// Execute the `fastkit create-project` command.
///
/// Dispatch sequence:
/// 1. Resolve the project name and target directory
/// 2. Build and validate the `ProjectConfig` (flags over config defaults)
/// 3. Early-exit with a preview if `--dry-run`
/// 4. Guard a non-empty target (confirmation or `--force`)
/// 5. Confirm with the user unless `--yes` or `--quiet`
/// 6. Generate, then print the tree and next steps
#[instrument(skip_all, fields(project = tracing::field::Empty))]
pub fn execute(args: CreateProjectArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    // 1. Resolve name and path
    let name = match args.name.as_deref() {
        Some(name) => name.trim().to_owned(),
        None => prompt::input("Project name", DEFAULT_PROJECT_NAME)?,
    };
    tracing::Span::current().record("project", name.as_str());
    let parent = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let project_path = parent.join(&name);

    // 2. Build config (all validation happens here, before any disk access)
    let project = build_config(&args, &config, &name, &project_path)?;
    debug!(config = %project, path = %project_path.display(), "Project configuration resolved");
    warn_ignored_flags(&args, project.architecture().kind(), &output)?;

    // 3. Dry run: render into memory and describe
    if args.dry_run {
        return dry_run(&project, &config, &output);
    }

    // 4. Guard the target directory
    let orchestrator = local_orchestrator(&config)?;
    let overwrite = match orchestrator.inspect_target(&project_path)? {
        TargetState::Empty => false,
        _ if args.force => true,
        TargetState::GeneratedProject => confirm_overwrite(
            &project_path,
            "already holds a fastkit project. Wipe it and regenerate?",
        )?,
        TargetState::Occupied => confirm_overwrite(
            &project_path,
            "is not empty. Generate into it anyway?",
        )?,
    };

    // 5. Show configuration and confirm
    if output.is_interactive() && !args.yes {
        show_configuration(&project, &output)?;
        if !prompt::confirm("Proceed to create the project?", true)? {
            return Err(CliError::Cancelled);
        }
    }

    // 6. Generate
    output.header(&format!("Creating '{name}'..."))?;
    info!(path = %project_path.display(), overwrite, "Project generation started");

    let spinner = output.spinner("Generating project structure");
    let result = orchestrator.create_project(&project, overwrite);
    spinner.finish_and_clear();
    let creation = result?;

    info!(files = creation.tree.file_count(), "Project generation completed");

    if let Some(report) = &creation.cleanup {
        output.cleanup_report(&project_path, report)?;
    }
    output.tree(&project_path, &creation.tree)?;
    output.json(&CreateReport::new(
        &project,
        false,
        &creation.tree,
        creation.cleanup.as_ref(),
    ))?;

    output.success(&format!(
        "Project '{name}' created at {}",
        project_path.display()
    ))?;
    print_next_steps(&project, &output)?;

    Ok(())
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn build_config(
    args: &CreateProjectArgs,
    config: &AppConfig,
    name: &str,
    path: &Path,
) -> CliResult<ProjectConfig> {
    let defaults = &config.defaults;

    let kind = match args.architecture {
        Some(arch) => convert_architecture(arch),
        None => choice::<CoreArch>(None, defaults.architecture.as_deref())?,
    };

    let architecture = match kind {
        CoreArch::SingleService => ArchitectureConfig::SingleService,
        CoreArch::Fullstack => ArchitectureConfig::Fullstack(FrontendConfig {
            framework: args.frontend.map(convert_frontend).unwrap_or_default(),
            build_tool: args.build_tool.map(convert_build_tool).unwrap_or_default(),
            language: args.frontend_lang.map(convert_frontend_lang).unwrap_or_default(),
        }),
        CoreArch::Microservices => ArchitectureConfig::Microservices {
            services: args.services.clone(),
            include_gateway: !args.no_gateway,
        },
        CoreArch::Onion => ArchitectureConfig::Onion {
            entities: args.entities.clone(),
            cqrs: args.cqrs,
        },
    };

    let project = ProjectConfig::builder()
        .name(name)
        .path(path)
        .architecture(architecture)
        .database(choice(args.database.as_deref(), defaults.database.as_deref())?)
        .cache(choice(args.cache.as_deref(), defaults.cache.as_deref())?)
        .auth(choice(args.auth.as_deref(), defaults.auth.as_deref())?)
        .jobs(choice(args.jobs.as_deref(), defaults.jobs.as_deref())?)
        .include_docker(defaults.include_docker && !args.no_docker)
        .include_cicd(defaults.include_cicd && !args.no_cicd)
        .build()
        .map_err(CliError::from)?;

    Ok(project)
}

/// Flag value, else configured default, else the type's default.
fn choice<T>(flag: Option<&str>, configured: Option<&str>) -> CliResult<T>
where
    T: FromStr<Err = DomainError> + Default,
{
    match flag.or(configured) {
        Some(raw) => raw.trim().parse().map_err(CliError::from),
        None => Ok(T::default()),
    }
}

/// Architecture-specific flags given for another architecture.
fn warn_ignored_flags(
    args: &CreateProjectArgs,
    kind: CoreArch,
    output: &OutputManager,
) -> CliResult<()> {
    let mut ignored = Vec::new();
    if kind != CoreArch::Microservices && (!args.services.is_empty() || args.no_gateway) {
        ignored.push("--service/--no-gateway");
    }
    if kind != CoreArch::Onion && (!args.entities.is_empty() || args.cqrs) {
        ignored.push("--entity/--cqrs");
    }
    if kind != CoreArch::Fullstack
        && (args.frontend.is_some() || args.build_tool.is_some() || args.frontend_lang.is_some())
    {
        ignored.push("--frontend/--build-tool/--frontend-lang");
    }
    for flags in ignored {
        output.warning(&format!("{flags} ignored for architecture '{kind}'"))?;
    }
    Ok(())
}

// ── Type conversions CLI → core ───────────────────────────────────────────────

fn convert_architecture(arch: Architecture) -> CoreArch {
    match arch {
        Architecture::SingleService => CoreArch::SingleService,
        Architecture::Fullstack => CoreArch::Fullstack,
        Architecture::Microservices => CoreArch::Microservices,
        Architecture::Onion => CoreArch::Onion,
    }
}

fn convert_frontend(frontend: FrontendArg) -> FrontendFramework {
    match frontend {
        FrontendArg::React => FrontendFramework::React,
        FrontendArg::Vue => FrontendFramework::Vue,
        FrontendArg::Svelte => FrontendFramework::Svelte,
    }
}

fn convert_build_tool(tool: BuildToolArg) -> BuildTool {
    match tool {
        BuildToolArg::Vite => BuildTool::Vite,
        BuildToolArg::Webpack => BuildTool::Webpack,
    }
}

fn convert_frontend_lang(lang: FrontendLangArg) -> FrontendLanguage {
    match lang {
        FrontendLangArg::Ts => FrontendLanguage::TypeScript,
        FrontendLangArg::Js => FrontendLanguage::JavaScript,
    }
}

// ── Dry run ───────────────────────────────────────────────────────────────────

fn dry_run(project: &ProjectConfig, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let orchestrator = orchestrator_on(Arc::new(MemoryFilesystem::new()), config)?;
    let tree = orchestrator.scaffold_project_structure(project)?;

    output.info(&format!(
        "Dry run: would create '{}' at {}",
        project.name(),
        project.path().display()
    ))?;
    show_configuration(project, output)?;
    output.print("Planned files:")?;
    output.tree(project.path(), &tree)?;
    output.json(&CreateReport::new(project, true, &tree, None))?;
    Ok(())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn confirm_overwrite(path: &Path, question: &str) -> CliResult<bool> {
    let question = format!("Directory '{}' {question}", path.display());
    if prompt::confirm(&question, false)? {
        Ok(true)
    } else {
        Err(CliError::ProjectExists {
            path: path.to_path_buf(),
        })
    }
}

fn show_configuration(project: &ProjectConfig, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.field("Project", project.name())?;
    out.field("Location", &project.path().display().to_string())?;
    out.field("Architecture", project.architecture().kind().as_str())?;
    match project.architecture() {
        ArchitectureConfig::SingleService => {}
        ArchitectureConfig::Fullstack(frontend) => {
            out.field(
                "Frontend",
                &format!(
                    "{} ({}, {})",
                    frontend.framework, frontend.build_tool, frontend.language
                ),
            )?;
        }
        ArchitectureConfig::Microservices {
            services,
            include_gateway,
        } => {
            out.field("Services", &list_or_none(services))?;
            out.field("Gateway", &include_gateway.to_string())?;
        }
        ArchitectureConfig::Onion { entities, cqrs } => {
            out.field("Entities", &list_or_none(entities))?;
            out.field("CQRS", &cqrs.to_string())?;
        }
    }
    out.field("Auth", project.auth().as_str())?;
    out.field("Database", project.database().as_str())?;
    out.field("Cache", project.cache().as_str())?;
    out.field("Jobs", project.jobs().as_str())?;
    out.field("Docker", &project.include_docker().to_string())?;
    out.field("CI/CD", &project.include_cicd().to_string())?;
    out.print("")?;
    Ok(())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".into()
    } else {
        items.join(", ")
    }
}

fn print_next_steps(project: &ProjectConfig, output: &OutputManager) -> CliResult<()> {
    if output.is_quiet() {
        return Ok(());
    }
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", project.path().display()))?;
    match project.architecture().kind() {
        CoreArch::Microservices => output.print("  docker compose up --build")?,
        CoreArch::Fullstack => {
            output.print("  (cd backend && pip install -e . && uvicorn app.main:app --reload)")?;
            output.print("  (cd frontend && npm install && npm run dev)")?;
        }
        CoreArch::Onion => {
            output.print("  pip install -e .")?;
            output.print("  uvicorn src.presentation.main:app --reload")?;
        }
        CoreArch::SingleService => {
            output.print("  pip install -e .")?;
            output.print("  uvicorn app.main:app --reload")?;
        }
    }
    Ok(())
}

// ── JSON report ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateReport<'a> {
    command: &'static str,
    dry_run: bool,
    project: &'a ProjectConfig,
    files: Vec<String>,
    cleanup: Option<&'a CleanupReport>,
    generated_at: String,
}

impl<'a> CreateReport<'a> {
    fn new(
        project: &'a ProjectConfig,
        dry_run: bool,
        tree: &GeneratedTree,
        cleanup: Option<&'a CleanupReport>,
    ) -> Self {
        Self {
            command: "create-project",
            dry_run,
            project,
            files: tree.files().map(|p| relative(project.path(), p)).collect(),
            cleanup,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
