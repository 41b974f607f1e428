use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::inference::same_model;

/// A model the user registered for translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationModel {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    /// Last known presence on the backend; may be stale.
    #[serde(default)]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl TranslationModel {
    pub fn new(name: impl Into<String>, is_available: bool) -> Self {
        Self {
            name: name.into(),
            is_default: false,
            is_available,
            last_used: None,
        }
    }
}

/// Registered models plus the default-model pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(default)]
    pub models: Vec<TranslationModel>,
}

/// Partial update merged by [`super::SettingsStore::update_settings`].
///
/// `default_model: Some(None)` clears the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub models: Option<Vec<TranslationModel>>,
    pub default_model: Option<Option<String>>,
}

impl TranslationSettings {
    pub fn find(&self, name: &str) -> Option<&TranslationModel> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Checks the invariants a persisted value must satisfy.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                bail!("Model name must not be empty");
            }
            if !seen.insert(model.name.as_str()) {
                bail!("Duplicate model '{}'", model.name);
            }
        }

        if self.models.iter().filter(|m| m.is_default).count() > 1 {
            bail!("More than one model is marked as default");
        }

        if let Some(default) = &self.default_model
            && self.find(default).is_none()
        {
            bail!("Default model '{default}' is not registered");
        }

        Ok(())
    }

    /// Re-derives `is_default` flags from the default pointer.
    pub fn normalize(&mut self) {
        if let Some(default) = &self.default_model
            && self.find(default).is_none()
        {
            self.default_model = None;
        }

        let default = self.default_model.as_deref();
        for model in &mut self.models {
            model.is_default = default == Some(model.name.as_str());
        }
    }

    pub fn apply(&mut self, update: SettingsUpdate) -> Result<()> {
        let replaced_models = update.models.is_some();
        if let Some(models) = update.models {
            self.models = models;
        }

        if let Some(default_model) = update.default_model {
            self.default_model = default_model;
        } else if replaced_models
            && self
                .default_model
                .as_deref()
                .is_none_or(|d| self.find(d).is_none())
        {
            // new model list without an explicit pointer: honour its flags
            self.default_model = self
                .models
                .iter()
                .find(|m| m.is_default)
                .map(|m| m.name.clone());
        }

        self.normalize();
        self.validate()
    }

    /// Registers a model. The first registered model becomes the default.
    pub fn add_model(&mut self, name: &str, is_available: bool) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Model name must not be empty");
        }
        if self.models.iter().any(|m| same_model(&m.name, name)) {
            bail!("Model '{name}' is already registered");
        }

        self.models.push(TranslationModel::new(name, is_available));
        if self.default_model.is_none() {
            self.default_model = Some(name.to_string());
        }
        self.normalize();
        Ok(())
    }

    /// Removes a model, handing the default to the first remaining model.
    pub fn remove_model(&mut self, name: &str) -> Result<()> {
        let Some(index) = self.models.iter().position(|m| m.name == name) else {
            bail!("Model '{name}' is not registered");
        };

        self.models.remove(index);
        if self.default_model.as_deref() == Some(name) {
            self.default_model = self.models.first().map(|m| m.name.clone());
        }
        self.normalize();
        Ok(())
    }

    pub fn set_default_model(&mut self, name: &str) -> Result<()> {
        if self.find(name).is_none() {
            bail!("Model '{name}' is not registered");
        }
        self.default_model = Some(name.to_string());
        self.normalize();
        Ok(())
    }

    /// Stamps `last_used` on the matching model. Returns whether one matched.
    pub fn record_usage(&mut self, name: &str, at: DateTime<Utc>) -> bool {
        match self.models.iter_mut().find(|m| same_model(&m.name, name)) {
            Some(model) => {
                model.last_used = Some(at);
                true
            }
            None => false,
        }
    }
}
