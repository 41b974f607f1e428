use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ltr")]
#[command(about = "Translate between English and Japanese with a local Ollama model")]
#[command(version)]
pub struct Args {
    /// File to translate (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Source language code (en or ja)
    #[arg(short = 'f', long = "from", global = true)]
    pub from: Option<String>,

    /// Target language code (en or ja)
    #[arg(short = 't', long = "to", global = true)]
    pub to: Option<String>,

    /// Model name; falls back to the default model when the backend lacks it
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Ollama endpoint URL
    #[arg(short = 'e', long, global = true)]
    pub endpoint: Option<String>,

    /// Print results as a JSON response envelope
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported language codes
    Languages,
    /// Check whether the Ollama server is reachable
    Status,
    /// Manage registered translation models
    Models {
        #[command(subcommand)]
        command: Option<ModelsCommand>,
    },
    /// Interactively set the endpoint and default languages
    Configure,
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List registered models and the models the backend serves
    List,
    /// Register a model
    Add {
        /// Model name as known to Ollama (e.g. llama3.1:8b)
        name: String,
    },
    /// Unregister a model
    Remove {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Make a registered model the default
    Default { name: String },
    /// Re-check which registered models the backend serves
    Refresh,
}
