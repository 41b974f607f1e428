//! Typed boundary for front ends.
//!
//! [`Api`] validates raw input, forwards to the [`Translator`], the backend
//! or the settings store, and reports failures as [`ApiError`] values whose
//! `kind` separates validation problems from execution failures.

mod dto;

use std::future::Future;
use std::sync::Arc;

pub use dto::{ApiError, ApiResponse, ApiResult, TranslateInput};

use crate::error::TranslateError;
use crate::inference::{InferenceBackend, ModelInfo, StatusReport};
use crate::settings::{SettingsStore, TranslationSettings};
use crate::translation::{TranslationResponse, Translator};

pub struct Api {
    translator: Translator,
    backend: Arc<dyn InferenceBackend>,
    settings: Arc<dyn SettingsStore>,
}

impl Api {
    pub fn new(backend: Arc<dyn InferenceBackend>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            translator: Translator::new(Arc::clone(&backend), Arc::clone(&settings)),
            backend,
            settings,
        }
    }

    /// Validates `input` and starts the translation.
    ///
    /// Like [`Translator::translate`], the busy state is entered when this is
    /// called, so a concurrent [`Self::cancel_translation`] sees it.
    pub fn translate(
        &self,
        input: TranslateInput,
    ) -> impl Future<Output = ApiResult<TranslationResponse>> + Send + '_ {
        let translation = input
            .validate()
            .map(|request| self.translator.translate(request));

        async move { Ok(translation?.await?) }
    }

    pub fn cancel_translation(&self) -> bool {
        self.translator.cancel_translation()
    }

    pub fn is_translating(&self) -> bool {
        self.translator.is_translating()
    }

    pub async fn connection_status(&self) -> StatusReport {
        self.backend.connection_status().await
    }

    pub async fn list_backend_models(&self) -> ApiResult<Vec<ModelInfo>> {
        Ok(self.backend.list_models().await?)
    }

    pub async fn get_settings(&self) -> TranslationSettings {
        self.settings.get_settings().await
    }

    /// Registers `name`, recording whether the backend currently has it.
    pub async fn add_model(&self, name: &str) -> ApiResult<TranslationSettings> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TranslateError::validation("Model name must not be empty").into());
        }
        let is_available = self.backend.model_exists(name).await;
        if !is_available {
            tracing::warn!(model = name, "registering a model the backend does not have");
        }
        Ok(self.settings.add_model(name, is_available).await?)
    }

    pub async fn remove_model(&self, name: &str) -> ApiResult<TranslationSettings> {
        Ok(self.settings.remove_model(name).await?)
    }

    pub async fn set_default_model(&self, name: &str) -> ApiResult<TranslationSettings> {
        Ok(self.settings.set_default_model(name).await?)
    }

    /// Re-checks availability of every registered model.
    pub async fn refresh_models(&self) -> ApiResult<TranslationSettings> {
        Ok(self.translator.refresh_model_availability().await?)
    }

    /// Waits for bookkeeping started by earlier translations.
    pub async fn shutdown(&self) {
        self.translator.wait_for_background_tasks().await;
    }
}
