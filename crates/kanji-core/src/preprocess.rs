use unicode_normalization::UnicodeNormalization;

use crate::error::ResolveError;

pub trait Preprocessor {
    // Default kanji input preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // NFKC folds CJK compatibility ideographs onto their unified forms
        let text: String = text.nfkc().collect();

        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Split command-line input into individual characters
    fn split_characters(&self, text: &str) -> Vec<String> {
        self.process(text).chars().map(|c| c.to_string()).collect()
    }

    /// Normalize input that must be exactly one character
    fn single_character(&self, text: &str) -> Result<String, ResolveError> {
        let processed = self.process(text);
        let mut chars = processed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c.to_string()),
            _ => Err(ResolveError::InvalidCharacter {
                input: text.to_string(),
            }),
        }
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
