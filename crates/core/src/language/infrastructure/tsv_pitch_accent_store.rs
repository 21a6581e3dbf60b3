use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::language::domain::kana;
use crate::language::domain::pitch_accent::{PitchAccentEntry, PitchAccentStore};
use crate::shared::provider_error::ProviderError;

/// Pitch accents from a tab-separated file of `headword reading patterns`
/// lines, where `patterns` is a comma-separated list of downstep positions
/// (the Kanjium `accents.txt` layout). An empty reading means the headword
/// is its own reading.
#[derive(Debug, Default)]
pub struct TsvPitchAccentStore {
    entries: HashMap<String, Vec<PitchAccentEntry>>,
}

impl TsvPitchAccentStore {
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let text = fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::parse(&text);
        log::info!(
            "Loaded pitch accents for {} headwords from {}",
            store.entries.len(),
            path.display()
        );
        Ok(store)
    }

    /// Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries: HashMap<String, Vec<PitchAccentEntry>> = HashMap::new();
        for line in text.lines() {
            let mut columns = line.split('\t');
            let (Some(headword), Some(reading), Some(patterns)) =
                (columns.next(), columns.next(), columns.next())
            else {
                continue;
            };
            let headword = headword.trim();
            if headword.is_empty() {
                continue;
            }
            let reading = match reading.trim() {
                "" => kana::to_hiragana(headword),
                r => kana::to_hiragana(r),
            };
            let bucket = entries.entry(headword.to_string()).or_default();
            for downstep in patterns.split(',').filter_map(|p| p.trim().parse::<usize>().ok()) {
                bucket.push(PitchAccentEntry {
                    headword: headword.to_string(),
                    reading: reading.clone(),
                    downstep,
                });
            }
        }
        entries.retain(|_, bucket| !bucket.is_empty());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PitchAccentStore for TsvPitchAccentStore {
    /// Entries for `headword`, narrowed to `reading` when one is given.
    fn lookup(&self, headword: &str, reading: &str) -> Result<Vec<PitchAccentEntry>, ProviderError> {
        let Some(bucket) = self.entries.get(headword) else {
            return Ok(Vec::new());
        };
        if reading.is_empty() {
            return Ok(bucket.clone());
        }
        let wanted = kana::to_hiragana(reading);
        Ok(bucket
            .iter()
            .filter(|entry| entry.reading == wanted)
            .cloned()
            .collect())
    }
}
