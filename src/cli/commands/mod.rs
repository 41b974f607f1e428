//! Subcommand implementations.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::api::{Api, ApiResponse, ApiResult};
use crate::config::ResolvedConfig;
use crate::inference::OllamaClient;
use crate::settings::FileSettingsStore;

/// Configure command handler.
pub mod configure;

/// Model registry command handler.
pub mod models;

/// Backend status command handler.
pub mod status;

/// Translation command handler.
pub mod translate;

/// Wires the API against the configured Ollama server and settings file.
pub fn build_api(config: &ResolvedConfig) -> Result<Api> {
    let backend = OllamaClient::new(config.endpoint.clone()).with_probe_timeout(config.probe_timeout);
    let settings = FileSettingsStore::new()?;
    Ok(Api::new(Arc::new(backend), Arc::new(settings)))
}

/// Prints `result` to stdout as a response envelope, then hands back the
/// error so the exit status still reflects it.
pub fn print_json<T: Serialize>(result: ApiResult<T>) -> Result<()> {
    let response = ApiResponse::from(result);
    println!("{}", serde_json::to_string_pretty(&response)?);
    match response.error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}
