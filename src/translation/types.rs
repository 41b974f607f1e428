use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::language::Language;

/// Input to a single translation.
///
/// `model_name` is a hint; the translator verifies the model exists before
/// using it and falls back otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    #[serde(default)]
    pub source_language: Option<Language>,
    #[serde(default)]
    pub target_language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source: Language, target: Language) -> Self {
        Self {
            text: text.into(),
            source_language: Some(source),
            target_language: Some(target),
            model_name: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }
}

/// Result of a completed translation. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub translated_text: String,
    pub source_language: Language,
    pub target_language: Language,
    pub model_used: String,
    pub timestamp: DateTime<Utc>,
}
