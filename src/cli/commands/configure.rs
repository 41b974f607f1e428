//! Configure command handler for the endpoint and default languages.

use anyhow::{Result, bail};
use inquire::{Select, Text};
use std::fmt;

use crate::config::{ConfigFile, ConfigManager, DEFAULT_ENDPOINT};
use crate::translation::{Language, SUPPORTED_LANGUAGES};
use crate::ui::{Style, interactive};

/// Interactively edits `config.toml`. Cancelling a prompt leaves the file untouched.
pub fn run_configure() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    print_current(&config);

    let Some((endpoint, from)) = interactive(|| {
        let endpoint = prompt_endpoint(config.backend.endpoint.as_deref())?;
        let from = select_source_language(config.defaults.from.as_deref())?;
        Ok((endpoint, from))
    })?
    else {
        return Ok(());
    };

    config.backend.endpoint = Some(endpoint);
    config.defaults.from = Some(from.code().to_string());
    config.defaults.to = Some(from.other().code().to_string());
    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn print_current(config: &ConfigFile) {
    let show = |value: Option<&str>| value.map_or_else(|| Style::secondary("(not set)"), Style::value);

    println!("{}", Style::header("Current configuration"));
    println!(
        "  {}  {}",
        Style::label("endpoint"),
        show(config.backend.endpoint.as_deref())
    );
    println!(
        "  {}      {}",
        Style::label("from"),
        show(config.defaults.from.as_deref())
    );
    println!(
        "  {}        {}",
        Style::label("to"),
        show(config.defaults.to.as_deref())
    );
    println!();
}

fn prompt_endpoint(current: Option<&str>) -> Result<String> {
    let endpoint = Text::new("Ollama endpoint:")
        .with_default(current.unwrap_or(DEFAULT_ENDPOINT))
        .prompt()?;
    validate_endpoint(endpoint.trim())?;
    Ok(endpoint.trim().to_string())
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        bail!("Endpoint must start with http:// or https://, got '{endpoint}'");
    }
    Ok(())
}

/// A language shown with its display name in the selection list.
struct LanguageChoice(Language);

impl fmt::Display for LanguageChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.code(), self.0.display_name())
    }
}

fn select_source_language(current: Option<&str>) -> Result<Language> {
    let choices: Vec<LanguageChoice> = SUPPORTED_LANGUAGES.iter().copied().map(LanguageChoice).collect();
    let cursor = current
        .and_then(|code| SUPPORTED_LANGUAGES.iter().position(|l| l.code() == code))
        .unwrap_or(0);

    let choice = Select::new("Translate from (the other language becomes the target):", choices)
        .with_starting_cursor(cursor)
        .prompt()?;

    Ok(choice.0)
}
