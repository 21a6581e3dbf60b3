use std::sync::Arc;

use crate::language::domain::annotation_generator::AnnotationGenerator;
use crate::language::domain::kana;
use crate::language::domain::tokenizer::{Token, Tokenizer};
use crate::shared::provider_error::ProviderError;

/// Builds `base[reading]` annotations from tokenizer readings.
///
/// Morphemes are separated by a single space so that each bracket applies
/// only to its own run. Trailing okurigana stay outside the bracket:
/// `読む` with reading `よむ` becomes `読[よ]む`.
pub struct ReadingAnnotationGenerator {
    tokenizer: Arc<dyn Tokenizer>,
}

impl ReadingAnnotationGenerator {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    fn annotate_text(&self, text: &str) -> Result<String, ProviderError> {
        let tokens = self.tokenizer.analyze(text)?;
        Ok(annotate_tokens(&tokens))
    }
}

impl AnnotationGenerator for ReadingAnnotationGenerator {
    fn generate(&self, sentence: &str) -> Result<String, ProviderError> {
        self.annotate_text(sentence)
    }

    fn generate_for_word(&self, word: &str) -> Result<String, ProviderError> {
        self.annotate_text(word)
    }
}

fn annotate_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| !t.surface.trim().is_empty())
        .map(|t| annotate(&t.surface, &t.reading))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Annotates one morpheme. Text without kanji, or without a reading, is returned as is.
pub(crate) fn annotate(surface: &str, reading: &str) -> String {
    if reading.is_empty() || !kana::contains_kanji(surface) {
        return surface.to_string();
    }

    let surface_chars: Vec<char> = surface.chars().collect();
    let reading_chars: Vec<char> = kana::to_hiragana(reading).chars().collect();

    // Shared kana tail, keeping at least one character on each side.
    let mut okurigana = 0;
    while okurigana + 1 < surface_chars.len() && okurigana + 1 < reading_chars.len() {
        let s = surface_chars[surface_chars.len() - 1 - okurigana];
        let r = reading_chars[reading_chars.len() - 1 - okurigana];
        if !kana::is_kana(s) || kana::to_hiragana(&s.to_string()) != r.to_string() {
            break;
        }
        okurigana += 1;
    }

    let base: String = surface_chars[..surface_chars.len() - okurigana].iter().collect();
    let core: String = reading_chars[..reading_chars.len() - okurigana].iter().collect();
    let tail: String = surface_chars[surface_chars.len() - okurigana..].iter().collect();
    format!("{base}[{core}]{tail}")
}
