//! Flags accepted before or after any subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum, builder::FalseyValueParser};

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// More log output: -v info, -vv debug (every file written), -vvv trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never emit ANSI colours (any non-empty NO_COLOR also does this)
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Read settings from FILE instead of the per-user config file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append JSON log events to FILE
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// How results are printed on stdout
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise
    #[default]
    Auto,
    /// Colours, spinners and prompts
    Human,
    /// No colours, no spinners
    Plain,
    /// One JSON report per command
    Json,
}
