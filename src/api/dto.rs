//! Wire types exchanged with API callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ErrorKind, TranslateError};
use crate::translation::{Language, TranslationRequest};

/// Untrusted translation input, with languages as raw codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateInput {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl TranslateInput {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            model_name: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Checks the input shape and converts it into a typed request.
    pub fn validate(self) -> Result<TranslationRequest, TranslateError> {
        if self.text.is_empty() {
            return Err(TranslateError::validation(
                "text: must contain at least 1 character",
            ));
        }
        let source = self.source_language.parse::<Language>()?;
        let target = self.target_language.parse::<Language>()?;

        if self.model_name.as_deref().is_some_and(str::is_empty) {
            return Err(TranslateError::validation(
                "modelName: must contain at least 1 character",
            ));
        }

        Ok(TranslationRequest {
            text: self.text,
            source_language: Some(source),
            target_language: Some(target),
            model_name: self.model_name,
        })
    }
}

/// Error half of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        Self::new(err.kind(), format!("{err:#}"))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(ErrorKind::Generic, format!("{err:#}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Response envelope: `{"ok": true, "data": ..}` or `{"ok": false, "error": ..}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub const fn failure(error: ApiError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> ApiResult<T> {
        match (self.ok, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(error)) => Err(error),
            _ => Err(ApiError::new(
                ErrorKind::Generic,
                "Malformed response envelope",
            )),
        }
    }
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_accepts_well_formed_input() {
        let request = TranslateInput::new("Hello", "en", "ja")
            .with_model("llama3")
            .validate()
            .unwrap();
        assert_eq!(request.source_language, Some(Language::En));
        assert_eq!(request.target_language, Some(Language::Ja));
        assert_eq!(request.model_name.as_deref(), Some("llama3"));
    }

    #[test]
    fn test_validate_rejects_empty_text() {
        let err = TranslateInput::new("", "en", "ja").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_validate_rejects_unknown_language() {
        let err = TranslateInput::new("Hello", "en", "fr")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("'fr'"));
    }

    #[test]
    fn test_validate_rejects_empty_model_name() {
        let err = TranslateInput::new("Hello", "en", "ja")
            .with_model("")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_input_uses_camel_case_fields() {
        let input: TranslateInput = serde_json::from_value(json!({
            "text": "Hello",
            "sourceLanguage": "en",
            "targetLanguage": "ja",
        }))
        .unwrap();
        assert_eq!(input, TranslateInput::new("Hello", "en", "ja"));
    }

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::success(true);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "ok": true, "data": true })
        );
    }

    #[test]
    fn test_failure_envelope_shape() {
        let result: ApiResult<bool> = Err(TranslateError::Busy.into());
        let response = ApiResponse::from(result);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "ok": false,
                "error": { "kind": "busy", "message": "A translation is already in progress" }
            })
        );
    }

    #[test]
    fn test_into_result_round_trips_error() {
        let json = r#"{"ok":false,"error":{"kind":"model_not_found","message":"gone"}}"#;
        let response: ApiResponse<bool> = serde_json::from_str(json).unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::ModelNotFound);
        assert_eq!(err.message, "gone");
    }

    #[test]
    fn test_settings_error_maps_to_generic() {
        let err = ApiError::from(TranslateError::from(anyhow::anyhow!("disk full")));
        assert_eq!(err.kind, ErrorKind::Generic);
        assert_eq!(err.message, "disk full");
    }
}
