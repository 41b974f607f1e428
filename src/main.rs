use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use ltr::cli::commands::{configure, models, status, translate};
use ltr::cli::{Args, Command, ModelsCommand, exit_code};
use ltr::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use ltr::logging;
use ltr::translation::print_languages;
use ltr::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", Style::error("Error:"));
            ExitCode::from(u8::try_from(exit_code(&e)).unwrap_or(1))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let options = ResolveOptions {
        endpoint: args.endpoint,
        from: args.from,
        to: args.to,
    };

    match args.command {
        Some(Command::Languages) => print_languages(),
        Some(Command::Configure) => configure::run_configure()?,
        Some(Command::Status) => status::run_status(&load_config(&options)?, args.json).await?,
        Some(Command::Models { command }) => {
            let command = command.unwrap_or(ModelsCommand::List);
            models::run_models(command, &load_config(&options)?, args.json).await?;
        }
        None => {
            let config = load_config(&options)?;
            let translate_options = translate::TranslateOptions {
                file: args.file,
                model: args.model,
                json: args.json,
            };
            translate::run_translate(translate_options, &config).await?;
        }
    }

    Ok(())
}

fn load_config(options: &ResolveOptions) -> Result<ResolvedConfig> {
    let config_file = ConfigManager::new()?.load_or_default();
    resolve_config(options, &config_file)
}
