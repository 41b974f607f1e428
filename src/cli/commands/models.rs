//! Model registry command handler.

use anyhow::Result;
use chrono::Local;
use inquire::Confirm;

use super::{build_api, print_json};
use crate::api::Api;
use crate::cli::ModelsCommand;
use crate::config::ResolvedConfig;
use crate::inference::same_model;
use crate::settings::TranslationSettings;
use crate::ui::{Style, interactive};

pub async fn run_models(command: ModelsCommand, config: &ResolvedConfig, json: bool) -> Result<()> {
    let api = build_api(config)?;

    match command {
        ModelsCommand::List => list_models(&api, json).await,
        ModelsCommand::Add { name } => {
            let result = api.add_model(&name).await;
            if json {
                return print_json(result);
            }
            let settings = result?;
            let name = name.trim();
            print_change(&format!("Model '{}' added", Style::value(name)));
            if needs_pull(&settings, name) {
                println!(
                    "{} The backend does not serve this model. Pull it with 'ollama pull {name}'.",
                    Style::warning("Warning:")
                );
            }
            Ok(())
        }
        ModelsCommand::Remove { name, yes } => {
            if !yes && !json && !confirm_removal(&name)? {
                println!("Cancelled");
                return Ok(());
            }
            let result = api.remove_model(&name).await;
            if json {
                return print_json(result);
            }
            let settings = result?;
            print_change(&format!("Model '{}' removed", Style::value(&name)));
            if let Some(default) = &settings.default_model {
                println!("  {} {}", Style::label("default is now"), Style::value(default));
            }
            Ok(())
        }
        ModelsCommand::Default { name } => {
            let result = api.set_default_model(&name).await;
            if json {
                return print_json(result);
            }
            result?;
            print_change(&format!("Default model set to '{}'", Style::value(&name)));
            Ok(())
        }
        ModelsCommand::Refresh => {
            let result = api.refresh_models().await;
            if json {
                return print_json(result);
            }
            print_registered(&result?);
            Ok(())
        }
    }
}

async fn list_models(api: &Api, json: bool) -> Result<()> {
    let settings = api.get_settings().await;
    if json {
        return print_json(Ok(settings));
    }

    print_registered(&settings);
    println!();

    match api.list_backend_models().await {
        Ok(served) => {
            println!("{}", Style::header("Served by backend"));
            if served.is_empty() {
                println!("  {}", Style::secondary("(none)"));
            }
            for model in served {
                let marker = if settings.models.iter().any(|m| same_model(&m.name, &model.name)) {
                    Style::success("registered")
                } else {
                    String::new()
                };
                println!("  {} {marker}", Style::value(&model.name));
            }
        }
        Err(e) => {
            println!("{} {e}", Style::warning("Backend unreachable:"));
        }
    }

    Ok(())
}

fn print_registered(settings: &TranslationSettings) {
    println!("{}", Style::header("Registered models"));
    if settings.models.is_empty() {
        println!("  {}", Style::secondary("(none) add one with 'ltr models add <name>'"));
        return;
    }

    for model in &settings.models {
        let mut line = format!("  {}", Style::value(&model.name));
        if model.is_default {
            line.push(' ');
            line.push_str(&Style::default_marker());
        }
        if !model.is_available {
            line.push(' ');
            line.push_str(&Style::warning("unavailable"));
        }
        if let Some(last_used) = model.last_used {
            line.push_str(&format!(
                " {}",
                Style::secondary(format!(
                    "last used {}",
                    last_used.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ))
            ));
        }
        println!("{line}");
    }
}

/// Whether a just-registered model is missing from the backend.
fn needs_pull(settings: &TranslationSettings, name: &str) -> bool {
    settings
        .find(name.trim())
        .is_some_and(|model| !model.is_available)
}

fn print_change(message: &str) {
    println!("{} {message}", Style::success("✓"));
}

fn confirm_removal(name: &str) -> Result<bool> {
    let confirmed = interactive(|| {
        Ok(Confirm::new(&format!("Remove model '{name}'?"))
            .with_default(false)
            .prompt()?)
    })?;
    Ok(confirmed.unwrap_or(false))
}
