//! Subscriber setup for the binary. The library crates only emit events.
//!
//! Default level is `warn`; each `-v` raises it one step (info, debug,
//! trace) and `--quiet` lowers it to `error`. A set `RUST_LOG` replaces
//! the whole filter.

use std::io::IsTerminal as _;
use std::path::Path;

use anyhow::Context as _;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

/// Crates whose events the default filter lets through.
const TARGETS: &[&str] = &["fastkit", "fastkit_cli", "fastkit_core", "fastkit_adapters"];

/// Install the global subscriber: compact stderr output, plus JSON lines
/// into `--log-file` when given. Keep the returned guard alive until exit
/// or buffered file events are lost.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<Option<WorkerGuard>> {
    let level = derive_level(args);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &args.log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(guard)
}

/// A never-rotating appender writing exactly `path`.
fn file_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path '{}' has no file name", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

fn default_directives(level: LevelFilter) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn derive_level(args: &GlobalArgs) -> LevelFilter {
    match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}
