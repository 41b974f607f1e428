use anyhow::Result;
use std::path::PathBuf;

use super::{build_api, print_json};
use crate::api::{Api, ApiResult, TranslateInput};
use crate::config::ResolvedConfig;
use crate::error::TranslateError;
use crate::input::read_input;
use crate::translation::TranslationResponse;
use crate::ui::Spinner;

pub struct TranslateOptions {
    pub file: Option<PathBuf>,
    pub model: Option<String>,
    pub json: bool,
}

pub async fn run_translate(options: TranslateOptions, config: &ResolvedConfig) -> Result<()> {
    let (Some(source), Some(target)) = (config.source_language, config.target_language) else {
        return Err(TranslateError::validation(
            "Missing language pair.\n\n\
             Provide it via:\n  \
             - CLI option: ltr --from <lang> or ltr --to <lang>\n  \
             - Config file: Run 'ltr configure' to set default languages",
        )
        .into());
    };

    let text = read_input(options.file.as_deref())?;
    if text.trim().is_empty() {
        return Err(TranslateError::validation("Input is empty").into());
    }

    let api = build_api(config)?;
    let mut input = TranslateInput::new(text, source.code(), target.code());
    if let Some(model) = options.model {
        input = input.with_model(model);
    }

    let spinner = (!options.json).then(|| Spinner::new("Translating..."));
    let result = translate_until_interrupted(&api, input).await;
    drop(spinner);

    api.shutdown().await;

    if options.json {
        return print_json(result);
    }

    let response = result?;
    tracing::debug!(model = %response.model_used, "translation finished");
    println!("{}", response.translated_text);
    Ok(())
}

/// Runs the translation, cancelling it if Ctrl+C arrives first.
async fn translate_until_interrupted(
    api: &Api,
    input: TranslateInput,
) -> ApiResult<TranslationResponse> {
    let translation = api.translate(input);
    tokio::pin!(translation);

    tokio::select! {
        result = &mut translation => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            api.cancel_translation();
            translation.await
        }
    }
}
