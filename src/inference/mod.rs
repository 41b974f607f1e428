//! Contract with the local model-serving backend and its Ollama implementation.

mod client;
mod stream_parser;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

pub use client::{DEFAULT_PROBE_TIMEOUT, OllamaClient, TextStream};
pub use stream_parser::ndjson_to_text_stream;

/// Tag the backend implies when a model name carries no version.
pub const DEFAULT_MODEL_TAG: &str = ":latest";

/// A model as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl ModelInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            modified_at: None,
            digest: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// One chat round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Connection state of the backend as seen by a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Connecting,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Outcome of one status check. Not cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: ConnectionStatus,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Capabilities the translator needs from an inference backend.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Liveness probe. Never fails; any problem reads as `false`.
    async fn is_connected(&self) -> bool;

    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Never fails; lookup errors read as `false`.
    async fn model_exists(&self, name: &str) -> bool;

    /// Non-streaming completion. Resolves to [`crate::TranslateError::Cancelled`]
    /// once `cancel` fires.
    async fn chat(&self, request: ChatRequest, cancel: &CancellationToken) -> Result<String>;

    /// Probes the backend once. Never cached.
    async fn connection_status(&self) -> StatusReport;
}

/// Strips the implied default tag so `llama3` and `llama3:latest` compare equal.
pub fn normalize_model_name(name: &str) -> &str {
    name.strip_suffix(DEFAULT_MODEL_TAG).unwrap_or(name)
}

pub fn same_model(a: &str, b: &str) -> bool {
    normalize_model_name(a) == normalize_model_name(b)
}
