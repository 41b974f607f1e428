//! Error taxonomy shared by the inference client, the orchestrator and the
//! API boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`TranslateError`], suitable for mapping to
/// user-facing messages or exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    BackendUnavailable,
    ModelNotFound,
    Network,
    Cancelled,
    Busy,
    Generic,
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("{0}")]
    Validation(String),

    #[error("Cannot reach the inference backend: {0}")]
    BackendUnavailable(String),

    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    #[error("No available models found")]
    NoAvailableModels,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Translation was cancelled")]
    Cancelled,

    #[error("A translation is already in progress")]
    Busy,

    #[error("{0}")]
    Generic(String),

    #[error(transparent)]
    Settings(#[from] anyhow::Error),
}

impl TranslateError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            Self::ModelNotFound(_) | Self::NoAvailableModels => ErrorKind::ModelNotFound,
            Self::Network(_) => ErrorKind::Network,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Busy => ErrorKind::Busy,
            Self::Generic(_) | Self::Settings(_) => ErrorKind::Generic,
        }
    }

    /// Cancellation is the caller's own doing and must not be retried.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Classifies a transport-level failure from the HTTP client.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() {
            return Self::BackendUnavailable(err.to_string());
        }
        if err.is_timeout() {
            return Self::Network(err.to_string());
        }
        // reqwest nests the io error; its text carries the useful detail
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        classify_message(&message)
    }

    /// Classifies a non-success HTTP response from the backend.
    pub fn from_status(status: reqwest::StatusCode, body: &str, model: Option<&str>) -> Self {
        let lower = body.to_lowercase();
        if status == reqwest::StatusCode::NOT_FOUND
            || (lower.contains("model") && lower.contains("not found"))
        {
            return model.map_or_else(
                || Self::Generic(format!("Backend returned {status}: {body}")),
                |name| Self::ModelNotFound(name.to_string()),
            );
        }
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Self::BackendUnavailable(format!("Backend returned {status}"));
        }
        Self::Generic(format!("Backend returned {status}: {body}"))
    }
}

/// Maps a free-form failure message onto the taxonomy.
pub fn classify_message(message: &str) -> TranslateError {
    let lower = message.to_lowercase();

    if ["econnrefused", "connection refused", "fetch failed", "dns error", "failed to lookup"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return TranslateError::BackendUnavailable(message.to_string());
    }

    if ["timeout", "timed out", "etimedout", "network", "connection reset", "broken pipe"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return TranslateError::Network(message.to_string());
    }

    if lower.contains("abort") || lower.contains("cancel") {
        return TranslateError::Cancelled;
    }

    TranslateError::Generic(message.to_string())
}

pub type Result<T> = std::result::Result<T, TranslateError>;
