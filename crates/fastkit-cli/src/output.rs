//! Everything the CLI prints on stdout, in the format the user picked.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use fastkit_core::domain::{CleanupReport, FsEntry, GeneratedTree};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Terminal writer resolved from `--output-format`, `--quiet` and colour
/// settings.
///
/// In JSON mode every human-oriented method is a no-op and only
/// [`OutputManager::json`] writes to stdout.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// The flag wins over `output.format`; `auto` picks by whether stdout
    /// is a terminal.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => parse_format(&config.output.format),
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    fn silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    // ── Messages ──────────────────────────────────────────────────────────

    /// Plain line on stdout.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Info, msg)
    }

    fn status(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(&self.decorate(tone, msg))
    }

    fn decorate(&self, tone: Tone, msg: &str) -> String {
        let symbol = tone.symbol();
        if self.no_color {
            return format!("{symbol} {msg}");
        }
        match tone {
            Tone::Success => format!("{} {}", symbol.green().bold(), msg.green()),
            Tone::Warning => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
            Tone::Info => format!("{} {}", symbol.blue().bold(), msg),
        }
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// `  key: value` line with the key padded to a fixed width.
    pub fn field(&self, key: &str, value: &str) -> io::Result<()> {
        let padded = format!("{key}:");
        let line = if self.no_color {
            format!("  {padded:<14}{value}")
        } else {
            format!("  {padded:<14}{}", value.cyan())
        };
        self.print(&line)
    }

    /// Pretty JSON document; only written in JSON mode.
    pub fn json<T: Serialize>(&self, value: &T) -> CliResult<()> {
        if self.resolved_format != OutputFormat::Json {
            return Ok(());
        }
        let rendered = serde_json::to_string_pretty(value)?;
        self.term.write_line(&rendered)?;
        Ok(())
    }

    /// Files a generator touched, relative to `root`.
    ///
    /// Directories are implied by the files and not listed.
    pub fn tree(&self, root: &Path, tree: &GeneratedTree) -> io::Result<()> {
        for entry in tree.entries() {
            let (marker, path) = match entry {
                FsEntry::Directory(_) => continue,
                FsEntry::File(p) => ("+", p),
                FsEntry::Patched(p) => ("~", p),
                FsEntry::Skipped(p) => ("=", p),
            };
            let shown = relative(root, path);
            let line = if self.no_color {
                format!("  {marker} {shown}")
            } else {
                match marker {
                    "+" => format!("  {} {shown}", marker.green()),
                    "~" => format!("  {} {shown}", marker.yellow()),
                    _ => format!("  {} {}", marker.dimmed(), shown.dimmed()),
                }
            };
            self.print(&line)?;
        }
        Ok(())
    }

    /// Summary of a best-effort cleanup, one warning per failure.
    pub fn cleanup_report(&self, root: &Path, report: &CleanupReport) -> io::Result<()> {
        if report.touched_anything() {
            self.info(&format!(
                "Cleaned up {} removed, {} patched",
                report.removed.len(),
                report.patched.len()
            ))?;
        }
        for failure in &report.failures {
            self.warning(&format!(
                "Could not clean {}: {}",
                relative(root, &failure.path),
                failure.reason
            ))?;
        }
        Ok(())
    }

    /// Spinner on stderr for the duration of a long step. Hidden unless
    /// output is for a human at a terminal.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.silent()
            || self.resolved_format != OutputFormat::Human
            || !io::stderr().is_terminal()
        {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// `true` when prompts may be shown: neither quiet nor JSON.
    pub fn is_interactive(&self) -> bool {
        !self.silent()
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }
}

fn parse_format(raw: &str) -> OutputFormat {
    match raw.to_ascii_lowercase().as_str() {
        "human" => OutputFormat::Human,
        "plain" => OutputFormat::Plain,
        "json" => OutputFormat::Json,
        _ => OutputFormat::Auto,
    }
}

/// `path` relative to `root` with `/` separators, or as-is outside it.
pub fn relative(root: &Path, path: &Path) -> String {
    let Ok(rel) = path.strip_prefix(root) else {
        return path.display().to_string();
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, no_color: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            quiet,
            no_color,
            output_format: format,
            ..GlobalArgs::default()
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(!out.is_interactive());
    }

    #[test]
    fn json_mode_is_silent() {
        let out = make_manager(false, false, OutputFormat::Json);
        assert!(out.silent());
        assert!(out.success("done").is_ok());
    }

    #[test]
    fn no_color_flag_reported() {
        let colored = make_manager(false, false, OutputFormat::Human);
        let no_color = make_manager(false, true, OutputFormat::Human);
        assert!(!colored.no_color);
        assert!(no_color.no_color);
    }

    #[test]
    fn plain_and_json_never_color() {
        assert!(make_manager(false, false, OutputFormat::Plain).no_color);
        assert!(make_manager(false, false, OutputFormat::Json).no_color);
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        let out = OutputManager::new(&GlobalArgs::default(), &config);
        assert_eq!(out.resolved_format, OutputFormat::Json);
        assert!(!out.is_interactive());
    }

    #[test]
    fn format_accessor_returns_resolved() {
        let out = make_manager(false, false, OutputFormat::Plain);
        assert_eq!(out.resolved_format, OutputFormat::Plain);
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = PathBuf::from("/work/shop");
        let file = root.join("app").join("core").join("config.py");
        assert_eq!(relative(&root, &file), "app/core/config.py");
        assert_eq!(relative(&root, Path::new("/elsewhere/x.py")), "/elsewhere/x.py");
    }

    #[test]
    fn hidden_spinner_outside_terminals() {
        let out = make_manager(false, true, OutputFormat::Plain);
        assert!(out.spinner("working").is_hidden());
    }
}
