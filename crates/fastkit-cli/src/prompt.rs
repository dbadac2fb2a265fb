//! Confirmation and text prompts.
//!
//! When stdin is not a terminal nothing is asked and the default answer is
//! returned, so piped and CI invocations never block.

use std::io::{self, IsTerminal};

use tracing::debug;

use crate::error::CliResult;

/// Ask a yes/no question.
pub fn confirm(question: &str, default: bool) -> CliResult<bool> {
    if !io::stdin().is_terminal() {
        debug!(question, default, "stdin is not a terminal, using default answer");
        return Ok(default);
    }
    ask_confirm(question, default)
}

/// Ask for a line of text.
pub fn input(question: &str, default: &str) -> CliResult<String> {
    if !io::stdin().is_terminal() {
        debug!(question, default, "stdin is not a terminal, using default answer");
        return Ok(default.to_owned());
    }
    ask_input(question, default)
}

#[cfg(feature = "interactive")]
fn ask_confirm(question: &str, default: bool) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(question)
        .default(default)
        .interact()
        .map_err(prompt_error)
}

#[cfg(feature = "interactive")]
fn ask_input(question: &str, default: &str) -> CliResult<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(question)
        .default(default.to_owned())
        .interact_text()
        .map(|answer| answer.trim().to_owned())
        .map_err(prompt_error)
}

#[cfg(feature = "interactive")]
fn prompt_error(err: dialoguer::Error) -> crate::error::CliError {
    crate::error::CliError::IoError {
        message: "failed to read prompt answer".into(),
        source: io::Error::other(err.to_string()),
    }
}

#[cfg(not(feature = "interactive"))]
fn ask_confirm(question: &str, default: bool) -> CliResult<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let answer = read_line(&format!("{question} {hint} "))?.to_ascii_lowercase();
    Ok(match answer.as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

#[cfg(not(feature = "interactive"))]
fn ask_input(question: &str, default: &str) -> CliResult<String> {
    let answer = read_line(&format!("{question} [{default}] "))?;
    Ok(if answer.is_empty() {
        default.to_owned()
    } else {
        answer
    })
}

#[cfg(not(feature = "interactive"))]
fn read_line(prompt: &str) -> CliResult<String> {
    use std::io::Write;

    use crate::error::IntoCli;

    eprint!("{prompt}");
    io::stderr()
        .flush()
        .with_cli_context(|| "failed to flush stderr")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;
    Ok(input.trim().to_owned())
}
