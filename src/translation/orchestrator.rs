//! The translation orchestrator: model resolution, prompt construction,
//! single-flight tracking and cancellation.

use chrono::Utc;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::language::Language;
use super::prompt::{TRANSLATION_TEMPERATURE, build_messages};
use super::types::{TranslationRequest, TranslationResponse};
use crate::error::{Result, TranslateError};
use crate::inference::{ChatRequest, InferenceBackend, same_model};
use crate::settings::{SettingsStore, TranslationSettings};

#[derive(Debug)]
enum State {
    Idle,
    Busy { id: u64, cancel: CancellationToken },
}

/// Returns the translator to `Idle` when the owning call ends, however it ends.
struct BusyGuard<'a> {
    translator: &'a Translator,
    id: u64,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.translator.lock_state();
        // a cancelled call may already have been replaced by a newer one
        if matches!(*state, State::Busy { id, .. } if id == self.id) {
            *state = State::Idle;
        }
    }
}

struct Admission<'a> {
    guard: BusyGuard<'a>,
    cancel: CancellationToken,
    source: Language,
    target: Language,
}

/// Orchestrates translations against an [`InferenceBackend`].
///
/// At most one translation is in flight per translator; an overlapping call
/// is rejected with [`TranslateError::Busy`]. Construct once and share it.
pub struct Translator {
    backend: Arc<dyn InferenceBackend>,
    settings: Arc<dyn SettingsStore>,
    state: Mutex<State>,
    next_id: AtomicU64,
    background: TaskTracker,
}

impl Translator {
    pub fn new(backend: Arc<dyn InferenceBackend>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            backend,
            settings,
            state: Mutex::new(State::Idle),
            next_id: AtomicU64::new(0),
            background: TaskTracker::new(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Translates `request`.
    ///
    /// Validation and the switch to the busy state happen when this is
    /// called, before the returned future is polled, so `is_translating()`
    /// reads `true` from that moment until the future completes or is dropped.
    pub fn translate(
        &self,
        request: TranslationRequest,
    ) -> impl Future<Output = Result<TranslationResponse>> + Send + '_ {
        let admission = self.admit(&request);

        async move {
            let Admission {
                guard,
                cancel,
                source,
                target,
            } = admission?;

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(TranslateError::Cancelled),
                result = self.run(request, source, target, &cancel) => result,
            };

            drop(guard);
            result
        }
    }

    /// Positional form of [`Self::translate`].
    pub fn translate_text(
        &self,
        text: impl Into<String>,
        source: Language,
        target: Language,
        model_name: Option<String>,
    ) -> impl Future<Output = Result<TranslationResponse>> + Send + '_ {
        self.translate(TranslationRequest {
            text: text.into(),
            source_language: Some(source),
            target_language: Some(target),
            model_name,
        })
    }

    /// Cancels the in-flight translation, if any. Returns whether one was cancelled.
    pub fn cancel_translation(&self) -> bool {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, State::Idle) {
            State::Busy { id, cancel } => {
                cancel.cancel();
                tracing::info!(operation = id, "translation cancelled");
                true
            }
            State::Idle => false,
        }
    }

    pub fn is_translating(&self) -> bool {
        matches!(*self.lock_state(), State::Busy { .. })
    }

    /// Picks the model to use: the requested one if the backend has it, then
    /// the configured default if the backend has it, then the first model the
    /// backend lists.
    pub async fn resolve_model(&self, requested: Option<&str>) -> Result<String> {
        if let Some(name) = requested {
            if self.backend.model_exists(name).await {
                return Ok(name.to_string());
            }
            tracing::warn!(model = name, "requested model not found on backend, falling back");
        }

        if let Some(default) = self.settings.get_settings().await.default_model {
            if self.backend.model_exists(&default).await {
                return Ok(default);
            }
            tracing::warn!(model = %default, "default model not found on backend, falling back");
        }

        self.backend
            .list_models()
            .await?
            .into_iter()
            .next()
            .map(|model| model.name)
            .ok_or(TranslateError::NoAvailableModels)
    }

    /// Re-checks every registered model against the backend and stores the result.
    pub async fn refresh_model_availability(&self) -> Result<TranslationSettings> {
        let names: Vec<String> = self
            .backend
            .list_models()
            .await?
            .into_iter()
            .map(|model| model.name)
            .collect();

        let settings = self
            .settings
            .modify(Box::new(move |settings| {
                for model in &mut settings.models {
                    model.is_available = names.iter().any(|n| same_model(n, &model.name));
                }
                Ok(())
            }))
            .await?;

        Ok(settings)
    }

    /// Waits for pending usage-recording tasks.
    pub async fn wait_for_background_tasks(&self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }

    fn admit(&self, request: &TranslationRequest) -> Result<Admission<'_>> {
        let (source, target) = validate(request)?;

        let mut state = self.lock_state();
        if matches!(*state, State::Busy { .. }) {
            return Err(TranslateError::Busy);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        *state = State::Busy {
            id,
            cancel: cancel.clone(),
        };
        drop(state);

        Ok(Admission {
            guard: BusyGuard {
                translator: self,
                id,
            },
            cancel,
            source,
            target,
        })
    }

    async fn run(
        &self,
        request: TranslationRequest,
        source: Language,
        target: Language,
        cancel: &CancellationToken,
    ) -> Result<TranslationResponse> {
        let model = self.resolve_model(request.model_name.as_deref()).await?;

        let translated_text = if source == target {
            tracing::debug!(model = %model, "source and target language match, skipping inference");
            request.text
        } else {
            tracing::debug!(model = %model, %source, %target, "translating");
            let chat = ChatRequest {
                model: model.clone(),
                messages: build_messages(&request.text, source, target),
                temperature: TRANSLATION_TEMPERATURE,
            };
            let output = self.backend.chat(chat, cancel).await?;
            self.record_usage(&model);
            output.trim().to_string()
        };

        Ok(TranslationResponse {
            translated_text,
            source_language: source,
            target_language: target,
            model_used: model,
            timestamp: Utc::now(),
        })
    }

    fn record_usage(&self, model: &str) {
        let settings = Arc::clone(&self.settings);
        let model = model.to_string();

        self.background.spawn(async move {
            if let Err(e) = settings.update_model_usage(&model).await {
                tracing::warn!(
                    model = %model,
                    error = %format_args!("{e:#}"),
                    "failed to record model usage"
                );
            }
        });
    }
}

fn validate(request: &TranslationRequest) -> Result<(Language, Language)> {
    let (Some(source), Some(target)) = (request.source_language, request.target_language) else {
        return Err(TranslateError::validation(
            "Source and target languages are required",
        ));
    };

    if request.text.is_empty() {
        return Err(TranslateError::validation("Text to translate must not be empty"));
    }

    if request.model_name.as_deref().is_some_and(str::is_empty) {
        return Err(TranslateError::validation("Model name must not be empty"));
    }

    Ok((source, target))
}
