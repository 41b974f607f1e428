//! Persistence of registered models and the default-model pointer.

mod file;
mod memory;
mod model;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;
pub use model::{SettingsUpdate, TranslationModel, TranslationSettings};

/// A mutation applied to a settings snapshot inside one read-modify-write cycle.
pub type SettingsEdit = Box<dyn FnOnce(&mut TranslationSettings) -> Result<()> + Send>;

/// Storage for [`TranslationSettings`].
///
/// Implementors provide a snapshot read and an atomic edit; the model
/// operations are built on top of those two.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Never fails; missing or invalid data reads as the default value.
    async fn get_settings(&self) -> TranslationSettings;

    /// Applies `edit` to the current value and persists the result. Nothing
    /// is persisted when `edit` fails.
    async fn modify(&self, edit: SettingsEdit) -> Result<TranslationSettings>;

    async fn update_settings(&self, update: SettingsUpdate) -> Result<TranslationSettings> {
        self.modify(Box::new(move |settings| settings.apply(update)))
            .await
    }

    async fn add_model(&self, name: &str, is_available: bool) -> Result<TranslationSettings> {
        let name = name.to_string();
        self.modify(Box::new(move |settings| {
            settings.add_model(&name, is_available)
        }))
        .await
    }

    async fn remove_model(&self, name: &str) -> Result<TranslationSettings> {
        let name = name.to_string();
        self.modify(Box::new(move |settings| settings.remove_model(&name)))
            .await
    }

    async fn set_default_model(&self, name: &str) -> Result<TranslationSettings> {
        let name = name.to_string();
        self.modify(Box::new(move |settings| settings.set_default_model(&name)))
            .await
    }

    /// Stamps `lastUsed` on `name`. Unregistered models are ignored.
    async fn update_model_usage(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.modify(Box::new(move |settings| {
            if !settings.record_usage(&name, Utc::now()) {
                tracing::debug!(model = %name, "usage recorded for unregistered model, ignoring");
            }
            Ok(())
        }))
        .await
        .map(|_| ())
    }
}
