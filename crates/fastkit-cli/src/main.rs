//! `fastkit`: generate FastAPI projects and grow them afterwards.
//!
//! Exit codes:
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! |  0   | Success                                             |
//! |  1   | Validation failure, declined prompt, internal error |
//! |  2   | Argument-parse error                                |
//! |  3   | Resource not found                                  |
//! |  4   | Configuration error                                 |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;

fn main() -> ExitCode {
    // Missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version land here too and must exit 0.
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // Dropping the guard flushes --log-file.
    let _log_guard = match init_logging(&cli.global) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let verbose = cli.global.verbose > 0;

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => return handle_error(e, verbose),
    };

    let output = OutputManager::new(&cli.global, &config);

    match run(cli, config, output) {
        Ok(()) => {
            info!("done");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::CreateProject(cmd) => commands::create_project::execute(cmd, config, output),
        Commands::AddDomain(cmd) => commands::add_domain::execute(cmd, config, output),
        Commands::AddService(cmd) => commands::add_service::execute(cmd, config, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global.config, config, output),
    }
}

/// Log the failure, print the report to stderr and map it to an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }
}
