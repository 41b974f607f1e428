use super::language::Language;
use crate::inference::ChatMessage;

pub const SYSTEM_PROMPT: &str = "You are a professional translator. \
     Translate the user's text accurately and naturally. \
     Return only the translated text, without explanations, notes, or any other commentary. \
     Preserve the original formatting including line breaks.";

pub const USER_PROMPT_TEMPLATE: &str =
    "Translate the following {source_language} text to {target_language}:\n\n{text}";

/// Sampling temperature for translation calls. Kept low for stable output.
pub const TRANSLATION_TEMPERATURE: f32 = 0.3;

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_user_prompt(text: &str, source: Language, target: Language) -> String {
    // placeholders are replaced textually, not format arguments
    USER_PROMPT_TEMPLATE
        .replace("{source_language}", source.display_name())
        .replace("{target_language}", target.display_name())
        .replace("{text}", text)
}

/// Builds the system + user message pair sent to the backend.
pub fn build_messages(text: &str, source: Language, target: Language) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(text, source, target)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_prompt() {
        let prompt = build_user_prompt("Hello World", Language::En, Language::Ja);
        assert_eq!(
            prompt,
            "Translate the following English text to Japanese:\n\nHello World"
        );
    }

    #[test]
    fn test_build_user_prompt_keeps_placeholder_like_text() {
        // text is substituted last so its content is never re-expanded
        let prompt = build_user_prompt("{source_language}", Language::Ja, Language::En);
        assert!(prompt.ends_with("\n\n{source_language}"));
        assert!(prompt.starts_with("Translate the following Japanese text to English"));
    }

    #[test]
    fn test_build_messages_roles() {
        let messages = build_messages("こんにちは", Language::Ja, Language::En);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("professional translator"));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("こんにちは"));
    }
}
