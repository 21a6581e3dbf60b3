use crate::shared::constants::CONTENT_PARTS_OF_SPEECH;
use crate::shared::provider_error::ProviderError;

use super::kana;

/// One morpheme of a tokenized sentence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub surface: String,
    pub part_of_speech: String,
    /// Lemma; equals `surface` when the tokenizer reports none.
    pub dictionary_form: String,
    /// Hiragana reading; empty when unknown.
    pub reading: String,
}

impl Token {
    pub fn is_content_word(&self) -> bool {
        CONTENT_PARTS_OF_SPEECH.contains(&self.part_of_speech.as_str())
    }
}

/// Domain interface for morphological analysis.
///
/// `dictionary_form` and `reading` default to analyzing the word itself:
/// the lemma of the first morpheme, and the concatenated readings of all
/// morphemes.
pub trait Tokenizer: Send + Sync {
    fn analyze(&self, sentence: &str) -> Result<Vec<Token>, ProviderError>;

    fn dictionary_form(&self, word: &str) -> Result<String, ProviderError> {
        let tokens = self.analyze(word)?;
        Ok(tokens
            .first()
            .map(|t| t.dictionary_form.clone())
            .filter(|form| !form.is_empty())
            .unwrap_or_else(|| word.to_string()))
    }

    fn reading(&self, word: &str) -> Result<String, ProviderError> {
        let tokens = self.analyze(word)?;
        Ok(tokens
            .iter()
            .map(|t| {
                if t.reading.is_empty() && t.surface.chars().all(kana::is_kana) {
                    kana::to_hiragana(&t.surface)
                } else {
                    t.reading.clone()
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTokenizer(Vec<Token>);

    impl Tokenizer for FixedTokenizer {
        fn analyze(&self, _sentence: &str) -> Result<Vec<Token>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    fn token(surface: &str, pos: &str, base: &str, reading: &str) -> Token {
        Token {
            surface: surface.into(),
            part_of_speech: pos.into(),
            dictionary_form: base.into(),
            reading: reading.into(),
        }
    }

    #[test]
    fn test_content_words() {
        assert!(token("本", "名詞", "本", "ほん").is_content_word());
        assert!(token("読む", "動詞", "読む", "よむ").is_content_word());
        assert!(!token("を", "助詞", "を", "を").is_content_word());
    }

    #[test]
    fn test_default_dictionary_form_uses_first_morpheme() {
        let tokenizer = FixedTokenizer(vec![
            token("読ん", "動詞", "読む", "よん"),
            token("だ", "助動詞", "だ", "だ"),
        ]);
        assert_eq!(tokenizer.dictionary_form("読んだ").unwrap(), "読む");
        assert_eq!(tokenizer.reading("読んだ").unwrap(), "よんだ");
    }

    #[test]
    fn test_default_forms_fall_back_to_surface() {
        let tokenizer = FixedTokenizer(vec![token("ラーメン", "名詞", "", "")]);
        assert_eq!(tokenizer.dictionary_form("ラーメン").unwrap(), "ラーメン");
        assert_eq!(tokenizer.reading("ラーメン").unwrap(), "らーめん");

        let empty = FixedTokenizer(Vec::new());
        assert_eq!(empty.dictionary_form("x").unwrap(), "x");
    }
}
