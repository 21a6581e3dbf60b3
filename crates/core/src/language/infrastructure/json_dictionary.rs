use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::language::domain::dictionary::{Dictionary, DictionaryEntry};
use crate::language::domain::kana;
use crate::shared::provider_error::ProviderError;

#[derive(Deserialize)]
struct RawEntry {
    headword: String,
    #[serde(default)]
    reading: String,
    #[serde(flatten)]
    entry: DictionaryEntry,
}

/// In-memory dictionary loaded from a JSON array of
/// `{"headword", "reading", "definition", "part_of_speech"}` objects.
///
/// Entries are indexed by headword and, for kana lookups, by reading. The
/// first entry for a key wins.
#[derive(Debug, Default)]
pub struct JsonDictionary {
    by_headword: HashMap<String, DictionaryEntry>,
    by_reading: HashMap<String, DictionaryEntry>,
}

impl JsonDictionary {
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let json = fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::from_json(&json)
            .map_err(|e| ProviderError::invalid_data(path.display().to_string(), e))?;
        log::info!(
            "Loaded {} dictionary entries from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        let mut dictionary = Self::default();
        for RawEntry {
            headword,
            reading,
            entry,
        } in raw
        {
            if !reading.is_empty() {
                dictionary
                    .by_reading
                    .entry(kana::to_hiragana(&reading))
                    .or_insert_with(|| entry.clone());
            }
            dictionary.by_headword.entry(headword).or_insert(entry);
        }
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.by_headword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_headword.is_empty()
    }

    fn find(&self, word: &str) -> Option<&DictionaryEntry> {
        if word.is_empty() {
            return None;
        }
        self.by_headword.get(word).or_else(|| {
            if word.chars().all(kana::is_kana) {
                self.by_reading.get(&kana::to_hiragana(word))
            } else {
                None
            }
        })
    }
}

impl Dictionary for JsonDictionary {
    fn lookup(
        &self,
        surface: &str,
        dictionary_form: &str,
    ) -> Result<Option<DictionaryEntry>, ProviderError> {
        Ok(self
            .find(surface)
            .or_else(|| self.find(dictionary_form))
            .cloned())
    }
}
