//! Application configuration (`config.toml`): backend endpoint and default languages.

mod manager;

pub use manager::{
    BackendConfig, ConfigFile, ConfigManager, DEFAULT_ENDPOINT, DefaultsConfig, ENDPOINT_ENV,
    ResolveOptions, ResolvedConfig, resolve_config,
};
