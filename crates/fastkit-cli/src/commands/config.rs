//! `fastkit config`: read and write configuration values.

use std::path::{Path, PathBuf};

use fastkit_core::domain::{
    Architecture, AuthProvider, CacheProvider, DbProvider, DomainError, JobsProvider,
};

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, KNOWN_KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `config_file` is the `--config` path, if any; `set` writes there instead
/// of the default location.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            output.print(&value)?;
            output.json(&serde_json::json!({ "key": key, "value": value }))?;
        }

        ConfigCommands::Set { key, value } => {
            let path = config_file.unwrap_or_else(AppConfig::config_path);
            set_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
            output.json(&config)?;
        }

        ConfigCommands::Path => {
            let path = AppConfig::config_path();
            output.print(&path.display().to_string())?;
            output.json(&serde_json::json!({ "path": path }))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn unknown_key(key: &str) -> CliError {
    CliError::UnknownConfigKey {
        key: key.into(),
        known: KNOWN_KEYS,
    }
}

/// Write one key into the TOML file at `path`, keeping everything else.
fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    let (section, field) = key
        .split_once('.')
        .filter(|_| KNOWN_KEYS.contains(&key))
        .ok_or_else(|| unknown_key(key))?;
    validate_choice(key, raw)?;

    let mut table = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str::<toml::Table>(&content).map_err(|e| CliError::ConfigError {
            message: format!("'{}' is not valid TOML: {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let value = match raw {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        other => toml::Value::String(other.to_owned()),
    };
    let section_table = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    match section_table {
        toml::Value::Table(inner) => {
            inner.insert(field.to_owned(), value);
        }
        _ => {
            return Err(CliError::ConfigError {
                message: format!("'{section}' in '{}' is not a table", path.display()),
                source: None,
            });
        }
    }

    // Reject values of the wrong type before anything is written.
    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .map_err(|e| CliError::ConfigError {
            message: format!("invalid value for {key}: {e}"),
            source: Some(Box::new(e)),
        })?;

    let rendered = toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, rendered)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;
    Ok(())
}

/// Provider defaults must name a choice `create-project` accepts.
fn validate_choice(key: &str, raw: &str) -> CliResult<()> {
    let parsed: Result<(), DomainError> = match key {
        "defaults.architecture" => raw.parse::<Architecture>().map(drop),
        "defaults.database" => raw.parse::<DbProvider>().map(drop),
        "defaults.cache" => raw.parse::<CacheProvider>().map(drop),
        "defaults.auth" => raw.parse::<AuthProvider>().map(drop),
        "defaults.jobs" => raw.parse::<JobsProvider>().map(drop),
        _ => Ok(()),
    };
    parsed.map_err(CliError::from)
}

// ── tests ─────────────────────────────────────────────────────────────────────
