/*!
 * Prompt construction for translation requests.
 */

/// Fixed translator persona sent as the system message
pub const SYSTEM_PROMPT: &str = "You are a translator assistant.";

/// Builds the user instruction for each request
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    target_language: String,
    preserve_names: bool,
}

impl TranslationPromptBuilder {
    /// Create a builder for the given target language
    pub fn new(target_language: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
            preserve_names: false,
        }
    }

    /// Ask the translator to leave people's names untranslated
    pub fn preserve_names(mut self, preserve: bool) -> Self {
        self.preserve_names = preserve;
        self
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// Instruction followed by a newline and the text to translate
    pub fn user_prompt(&self, text: &str) -> String {
        let names_clause = if self.preserve_names {
            " But do not translate people and authors' names and surnames."
        } else {
            ""
        };
        format!(
            "Translate the following text into {} in a way that is faithful to the original text.{} Return only the translation and nothing else:\n{}",
            self.target_language, names_clause, text
        )
    }
}
