use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use super::{SettingsEdit, SettingsStore, TranslationSettings};

/// Process-local store, for embedding without a settings file.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<TranslationSettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: TranslationSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TranslationSettings> {
        self.settings
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_settings(&self) -> TranslationSettings {
        self.lock().clone()
    }

    async fn modify(&self, edit: SettingsEdit) -> Result<TranslationSettings> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        edit(&mut next)?;
        *guard = next.clone();
        drop(guard);
        Ok(next)
    }
}
