use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{SettingsEdit, SettingsStore, TranslationSettings};
use crate::fs::atomic_write;
use crate::paths;

/// Settings persisted as TOML, by default at `$XDG_CONFIG_HOME/ltr/settings.toml`.
pub struct FileSettingsStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new() -> Result<Self> {
        Ok(Self::at(paths::settings_file()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, surfacing every problem. `get_settings` is the lenient form.
    pub fn load(&self) -> Result<TranslationSettings> {
        read_settings(&self.path)
    }
}

fn read_settings(path: &Path) -> Result<TranslationSettings> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(TranslationSettings::default());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read settings file: {}", path.display()));
        }
    };

    let settings: TranslationSettings =
        toml::from_str(&contents).context("Failed to parse settings file")?;
    settings
        .validate()
        .context("Settings file failed validation")?;

    Ok(settings)
}

fn write_settings(path: &Path, settings: &TranslationSettings) -> Result<()> {
    let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    atomic_write(path, &contents)
        .with_context(|| format!("Failed to write settings file: {}", path.display()))
}

// file I/O runs on the blocking pool
#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get_settings(&self) -> TranslationSettings {
        let path = self.path.clone();
        let loaded = tokio::task::spawn_blocking(move || read_settings(&path))
            .await
            .context("Settings reader task failed")
            .and_then(|result| result);

        loaded.unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %format_args!("{e:#}"),
                "ignoring unreadable settings, using defaults"
            );
            TranslationSettings::default()
        })
    }

    /// Fails without writing when the existing file cannot be read, parsed or
    /// validated.
    async fn modify(&self, edit: SettingsEdit) -> Result<TranslationSettings> {
        let _guard = self.write_lock.lock().await;

        let path = self.path.clone();
        let settings = tokio::task::spawn_blocking(move || {
            let mut settings = read_settings(&path)
                .context("Refusing to modify settings that cannot be loaded")?;
            edit(&mut settings)?;
            write_settings(&path, &settings)?;
            Ok::<_, anyhow::Error>(settings)
        })
        .await
        .context("Settings writer task failed")??;

        tracing::debug!(
            path = %self.path.display(),
            models = settings.models.len(),
            "settings saved"
        );
        Ok(settings)
    }
}
