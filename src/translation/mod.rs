mod language;
mod orchestrator;
mod prompt;
mod types;

pub use language::{Language, SUPPORTED_LANGUAGES, print_languages};
pub use orchestrator::Translator;
pub use prompt::{SYSTEM_PROMPT, TRANSLATION_TEMPERATURE, build_messages};
pub use types::{TranslationRequest, TranslationResponse};
