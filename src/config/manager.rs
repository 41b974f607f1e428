use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fs::atomic_write;
use crate::inference::DEFAULT_PROBE_TIMEOUT;
use crate::paths;
use crate::translation::Language;

/// Endpoint used when nothing else is configured (Ollama's default port).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Environment variable overriding the configured endpoint.
pub const ENDPOINT_ENV: &str = "LTR_ENDPOINT";

/// The `[backend]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the Ollama server.
    pub endpoint: Option<String>,
    /// Timeout for liveness and status probes, in seconds.
    pub probe_timeout_secs: Option<u64>,
}

/// The `[defaults]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default source language code.
    pub from: Option<String>,
    /// Default target language code.
    pub to: Option<String>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/ltr/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// CLI overrides that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub endpoint: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Configuration after merging CLI options, environment and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub probe_timeout: Duration,
    /// `None` when neither side could be determined; the translator rejects it.
    pub source_language: Option<Language>,
    pub target_language: Option<Language>,
}

/// Resolves configuration.
///
/// Endpoint: CLI option, then `LTR_ENDPOINT`, then config file, then
/// [`DEFAULT_ENDPOINT`]. Languages: CLI option, then config file; when only
/// one side is known the other is inferred, since exactly two languages are
/// supported.
///
/// # Errors
///
/// Returns an error if a configured language code is not supported.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let endpoint = options
        .endpoint
        .clone()
        .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty()))
        .or_else(|| config_file.backend.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let probe_timeout = config_file
        .backend
        .probe_timeout_secs
        .map_or(DEFAULT_PROBE_TIMEOUT, Duration::from_secs);

    let from = parse_language(options.from.as_ref().or(config_file.defaults.from.as_ref()))?;
    let to = parse_language(options.to.as_ref().or(config_file.defaults.to.as_ref()))?;

    let (source_language, target_language) = match (from, to) {
        (Some(from), None) => (Some(from), Some(from.other())),
        (None, Some(to)) => (Some(to.other()), Some(to)),
        pair => pair,
    };

    Ok(ResolvedConfig {
        endpoint,
        probe_timeout,
        source_language,
        target_language,
    })
}

fn parse_language(code: Option<&String>) -> Result<Option<Language>> {
    code.map(|c| c.parse::<Language>())
        .transpose()
        .map_err(anyhow::Error::from)
}

/// Manages loading and saving the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/ltr/config.toml`
    /// or `~/.config/ltr/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic_write(&self.config_path, &contents)
    }

    pub fn load_or_default(&self) -> ConfigFile {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                if self.config_path.exists() {
                    tracing::warn!(error = %format_args!("{e:#}"), "using default configuration");
                }
                ConfigFile::default()
            }
        }
    }
}
