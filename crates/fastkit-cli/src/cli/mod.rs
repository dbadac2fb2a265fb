//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "fastkit",
    bin_name = "fastkit",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} FastAPI project generator",
    long_about = "fastkit generates FastAPI project structures and grows them \
                  afterwards with domains and pluggable services \
                  (database, cache, auth, background jobs).",
    after_help = "EXAMPLES:\n\
        \x20 fastkit create-project shop --db postgresql --cache redis --auth jwt\n\
        \x20 fastkit create-project platform --arch microservices --service orders --service billing\n\
        \x20 fastkit add-domain products --path ./shop\n\
        \x20 fastkit add-service cache memcached --path ./shop --force\n\
        \x20 fastkit completions bash > /usr/share/bash-completion/completions/fastkit",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new FastAPI project.
    #[command(
        visible_alias = "new",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 fastkit create-project shop --db sqlite --yes\n\
            \x20 fastkit create-project web --arch fullstack --frontend vue --frontend-lang js\n\
            \x20 fastkit create-project core --arch onion --entity order --entity invoice --cqrs\n\
            \x20 fastkit create-project shop --path ~/code --dry-run"
    )]
    CreateProject(CreateProjectArgs),

    /// Add a domain package to an existing project.
    #[command(
        about = "Add a domain to a project",
        after_help = "EXAMPLES:\n\
            \x20 fastkit add-domain users\n\
            \x20 fastkit add-domain billing --path ./shop --no-tests"
    )]
    AddDomain(AddDomainArgs),

    /// Add or replace a pluggable service.
    #[command(
        about = "Add a service to a project",
        after_help = "EXAMPLES:\n\
            \x20 fastkit add-service db postgresql\n\
            \x20 fastkit add-service cache redis --path ./shop\n\
            \x20 fastkit add-service auth oauth --force"
    )]
    AddService(AddServiceArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 fastkit completions bash > ~/.local/share/bash-completion/completions/fastkit\n\
            \x20 fastkit completions zsh  > ~/.zfunc/_fastkit\n\
            \x20 fastkit completions fish > ~/.config/fish/completions/fastkit.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the fastkit configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 fastkit config get defaults.database\n\
            \x20 fastkit config set defaults.database postgresql\n\
            \x20 fastkit config list"
    )]
    Config(ConfigCommands),
}

// ── create-project ────────────────────────────────────────────────────────────

/// Arguments for `fastkit create-project`.
#[derive(Debug, Args)]
pub struct CreateProjectArgs {
    /// Project name. Prompted for when omitted on a terminal.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Directory the project folder is created in.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        help = "Parent directory (default: current directory)"
    )]
    pub path: Option<PathBuf>,

    /// Architecture style.
    #[arg(
        short = 'a',
        long = "arch",
        value_name = "ARCH",
        value_enum,
        help = "Architecture style"
    )]
    pub architecture: Option<Architecture>,

    /// Authentication provider.
    #[arg(long = "auth", value_name = "PROVIDER", help = "Auth provider: none, jwt, oauth")]
    pub auth: Option<String>,

    /// Database provider.
    #[arg(
        long = "db",
        value_name = "PROVIDER",
        help = "Database: none, postgresql, mysql, sqlite, mongodb, mssql"
    )]
    pub database: Option<String>,

    /// Cache provider.
    #[arg(
        long = "cache",
        value_name = "PROVIDER",
        help = "Cache: none, redis, memcached, in-memory, dynamodb"
    )]
    pub cache: Option<String>,

    /// Background job provider.
    #[arg(
        long = "jobs",
        value_name = "PROVIDER",
        help = "Jobs: none, celery, rq, dramatiq, arq, apscheduler"
    )]
    pub jobs: Option<String>,

    /// Microservice name (repeatable).
    #[arg(
        long = "service",
        value_name = "NAME",
        help = "Microservice to generate (repeatable, microservices only)"
    )]
    pub services: Vec<String>,

    /// Skip the API gateway service.
    #[arg(long = "no-gateway", help = "Do not generate the API gateway")]
    pub no_gateway: bool,

    /// Onion domain entity (repeatable).
    #[arg(
        long = "entity",
        value_name = "NAME",
        help = "Domain entity to generate (repeatable, onion only)"
    )]
    pub entities: Vec<String>,

    /// Generate command and query buses.
    #[arg(long = "cqrs", help = "Add CQRS buses (onion only)")]
    pub cqrs: bool,

    /// Frontend framework.
    #[arg(long = "frontend", value_enum, help = "Frontend framework (fullstack only)")]
    pub frontend: Option<FrontendArg>,

    /// Frontend build tool.
    #[arg(long = "build-tool", value_enum, help = "Frontend build tool (fullstack only)")]
    pub build_tool: Option<BuildToolArg>,

    /// Frontend language.
    #[arg(long = "frontend-lang", value_enum, help = "Frontend language (fullstack only)")]
    pub frontend_lang: Option<FrontendLangArg>,

    /// Skip the Dockerfile and compose file.
    #[arg(long = "no-docker", help = "Do not generate container files")]
    pub no_docker: bool,

    /// Skip the CI workflow.
    #[arg(long = "no-cicd", help = "Do not generate a CI workflow")]
    pub no_cicd: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Overwrite a non-empty target directory (destructive).
    #[arg(short = 'f', long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── add-domain ────────────────────────────────────────────────────────────────

/// Arguments for `fastkit add-domain`.
#[derive(Debug, Args)]
pub struct AddDomainArgs {
    /// Domain name, e.g. `users`.
    #[arg(value_name = "NAME", help = "Domain name (lowercase identifier)")]
    pub name: String,

    /// Project root.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        default_value = ".",
        help = "Project root (default: current directory)"
    )]
    pub path: PathBuf,

    /// Generate test modules (the default).
    #[arg(long = "with-tests", overrides_with = "no_tests", help = "Create test files")]
    pub with_tests: bool,

    /// Skip the test modules.
    #[arg(long = "no-tests", overrides_with = "with_tests", help = "Skip test files")]
    pub no_tests: bool,

    /// Overwrite an existing domain.
    #[arg(short = 'f', long = "force", help = "Overwrite the domain if it exists")]
    pub force: bool,
}

impl AddDomainArgs {
    /// Tests are generated unless `--no-tests` wins.
    pub fn generate_tests(&self) -> bool {
        !self.no_tests
    }
}

// ── add-service ───────────────────────────────────────────────────────────────

/// Arguments for `fastkit add-service`.
#[derive(Debug, Args)]
pub struct AddServiceArgs {
    /// Service type.
    #[arg(value_name = "TYPE", help = "Service type: db, cache, auth, jobs")]
    pub category: String,

    /// Provider within the type.
    #[arg(value_name = "PROVIDER", help = "Provider, e.g. postgresql or redis")]
    pub provider: String,

    /// Project root.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        default_value = ".",
        help = "Project root (default: current directory)"
    )]
    pub path: PathBuf,

    /// Replace an existing service of the same type.
    #[arg(short = 'f', long = "force", help = "Replace the service if it exists")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `fastkit completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `fastkit config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.database`.
        key: String,
    },
    /// Set a configuration key in the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Architecture styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Architecture {
    #[value(alias = "single")]
    SingleService,
    Fullstack,
    Microservices,
    #[value(alias = "onion-architecture")]
    Onion,
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleService => write!(f, "single-service"),
            Self::Fullstack => write!(f, "fullstack"),
            Self::Microservices => write!(f, "microservices"),
            Self::Onion => write!(f, "onion"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrontendArg {
    React,
    Vue,
    Svelte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildToolArg {
    Vite,
    Webpack,
}

/// Frontend language; the long names are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrontendLangArg {
    #[value(alias = "typescript")]
    Ts,
    #[value(alias = "javascript")]
    Js,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn architecture_display() {
        assert_eq!(Architecture::SingleService.to_string(), "single-service");
        assert_eq!(Architecture::Fullstack.to_string(), "fullstack");
        assert_eq!(Architecture::Microservices.to_string(), "microservices");
        assert_eq!(Architecture::Onion.to_string(), "onion");
    }

    #[test]
    fn parse_create_project_command() {
        let cli = Cli::parse_from([
            "fastkit",
            "create-project",
            "shop",
            "--db",
            "postgresql",
            "--arch",
            "microservices",
            "--service",
            "orders",
            "--service",
            "billing",
        ]);
        let Commands::CreateProject(args) = cli.command else {
            panic!("expected CreateProject command");
        };
        assert_eq!(args.name.as_deref(), Some("shop"));
        assert_eq!(args.database.as_deref(), Some("postgresql"));
        assert_eq!(args.architecture, Some(Architecture::Microservices));
        assert_eq!(args.services, ["orders", "billing"]);
    }

    #[test]
    fn architecture_aliases() {
        let cli = Cli::parse_from(["fastkit", "create-project", "x", "-a", "onion-architecture"]);
        if let Commands::CreateProject(args) = cli.command {
            assert_eq!(args.architecture, Some(Architecture::Onion));
        } else {
            panic!("expected CreateProject command");
        }
    }

    #[test]
    fn frontend_language_accepts_long_names() {
        let cli = Cli::parse_from(["fastkit", "new", "x", "--frontend-lang", "javascript"]);
        if let Commands::CreateProject(args) = cli.command {
            assert_eq!(args.frontend_lang, Some(FrontendLangArg::Js));
        } else {
            panic!("expected CreateProject command");
        }
    }

    #[test]
    fn no_tests_overrides_with_tests() {
        let cli = Cli::parse_from(["fastkit", "add-domain", "users", "--with-tests", "--no-tests"]);
        let Commands::AddDomain(args) = cli.command else {
            panic!("expected AddDomain command");
        };
        assert!(!args.generate_tests());

        let cli = Cli::parse_from(["fastkit", "add-domain", "users"]);
        let Commands::AddDomain(args) = cli.command else {
            panic!("expected AddDomain command");
        };
        assert!(args.generate_tests());
        assert_eq!(args.path, PathBuf::from("."));
    }

    #[test]
    fn add_service_takes_type_and_provider() {
        let cli = Cli::parse_from(["fastkit", "add-service", "cache", "redis", "--force"]);
        let Commands::AddService(args) = cli.command else {
            panic!("expected AddService command");
        };
        assert_eq!(args.category, "cache");
        assert_eq!(args.provider, "redis");
        assert!(args.force);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["fastkit", "--quiet", "--verbose", "config", "path"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_file_is_global() {
        let cli = Cli::parse_from(["fastkit", "config", "path", "--log-file", "run.log"]);
        assert_eq!(cli.global.log_file, Some(PathBuf::from("run.log")));
    }
}
