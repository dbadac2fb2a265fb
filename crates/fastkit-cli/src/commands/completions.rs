//! Shell completion generation.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::{
    cli::{Cli, CompletionsArgs, Shell},
    error::CliResult,
};

const BIN_NAME: &str = "fastkit";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_completions(args.shell, &mut out);
    out.flush()?;
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, BIN_NAME, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, BIN_NAME, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, BIN_NAME, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, BIN_NAME, out),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, BIN_NAME, out),
    }
}
