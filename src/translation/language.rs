//! The closed set of languages the translator works between.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TranslateError;
use crate::ui::Style;

/// A supported language, serialized as its ISO 639-1 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "ja")]
    Ja,
}

/// Supported language codes and their display names.
pub const SUPPORTED_LANGUAGES: &[Language] = &[Language::En, Language::Ja];

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    /// Name used inside prompts and listings.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ja => "Japanese",
        }
    }

    /// The opposite side of the supported pair.
    pub const fn other(self) -> Self {
        match self {
            Self::En => Self::Ja,
            Self::Ja => Self::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| {
                TranslateError::validation(format!(
                    "Invalid language code: '{s}'\n\n\
                     Valid language codes: {}\n\
                     Run 'ltr languages' to see all supported codes.",
                    SUPPORTED_LANGUAGES
                        .iter()
                        .map(|lang| lang.code())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported language codes (ISO 639-1)"));
    for lang in SUPPORTED_LANGUAGES {
        println!(
            "  {:5} {}",
            Style::code(lang.code()),
            Style::secondary(lang.display_name())
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_valid() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("ja".parse::<Language>().unwrap(), Language::Ja);
    }

    #[test]
    fn test_parse_language_invalid() {
        assert!("fr".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
        assert!("JA".parse::<Language>().is_err()); // Case sensitive
    }

    #[test]
    fn test_invalid_language_is_validation_error() {
        let err = "xx".parse::<Language>().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        assert!(err.to_string().contains("Invalid language code"));
    }

    #[test]
    fn test_other_language() {
        assert_eq!(Language::En.other(), Language::Ja);
        assert_eq!(Language::Ja.other(), Language::En);
    }

    #[test]
    fn test_language_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Ja).unwrap(), r#""ja""#);
        let parsed: Language = serde_json::from_str(r#""en""#).unwrap();
        assert_eq!(parsed, Language::En);
        assert!(serde_json::from_str::<Language>(r#""de""#).is_err());
    }
}
