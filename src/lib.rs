//! # ltr - Local LLM Translation
//!
//! `ltr` translates text between English and Japanese using a model served by
//! a locally running [Ollama](https://ollama.com) instance. Nothing leaves the
//! machine.
//!
//! ## Features
//!
//! - **Model fallback**: an unavailable requested model falls back to the
//!   configured default, then to whatever the backend serves first
//! - **Single flight**: one translation at a time, cancellable with Ctrl+C
//! - **Model registry**: registered models, a default, and last-used stamps
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file into Japanese
//! ltr --to ja ./notes.md
//!
//! # Translate from stdin with a specific model
//! cat report.md | ltr --from ja --model llama3.1:8b
//!
//! # Register a model and make it the default
//! ltr models add llama3.1:8b
//! ltr models default llama3.1:8b
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/ltr/config.toml`:
//!
//! ```toml
//! [backend]
//! endpoint = "http://localhost:11434"
//! probe_timeout_secs = 5
//!
//! [defaults]
//! from = "en"
//! to = "ja"
//! ```
//!
//! The model registry lives next to it in `settings.toml`.

/// Typed boundary for front ends: input validation and response envelopes.
pub mod api;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and option resolution.
pub mod config;

/// Error taxonomy.
pub mod error;

/// File system utilities.
pub mod fs;

/// Ollama HTTP client and the backend abstraction.
pub mod inference;

/// Input reading from files and stdin.
pub mod input;

/// Tracing subscriber setup.
pub mod logging;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Model registry persistence.
pub mod settings;

/// Translation orchestration, languages and prompts.
pub mod translation;

/// Terminal UI components (spinner, colors, prompts).
pub mod ui;

pub use error::{ErrorKind, TranslateError};
