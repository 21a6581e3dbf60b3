use std::fs;
use std::path::PathBuf;

use crate::shared::constants::PRONUNCIATION_EXTENSIONS;
use crate::shared::provider_error::ProviderError;
use crate::speech::domain::pronunciation_source::PronunciationSource;
use crate::speech::domain::speech_synthesizer::{AudioClip, AudioFormat};

/// Recorded pronunciations stored as `<word>.<ext>` files in one directory.
pub struct DirectoryPronunciationSource {
    root: PathBuf,
}

impl DirectoryPronunciationSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PronunciationSource for DirectoryPronunciationSource {
    fn name(&self) -> &str {
        "local recordings"
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn find(&self, word: &str) -> Result<Option<AudioClip>, ProviderError> {
        if word.is_empty() || word.contains(['/', '\\']) {
            return Ok(None);
        }
        for ext in PRONUNCIATION_EXTENSIONS {
            let file_name = format!("{word}.{ext}");
            let path = self.root.join(&file_name);
            if !path.is_file() {
                continue;
            }
            let bytes = fs::read(&path).map_err(|source| ProviderError::Io {
                path: path.clone(),
                source,
            })?;
            if bytes.is_empty() {
                log::warn!("Ignoring empty recording {}", path.display());
                continue;
            }
            let format = AudioFormat::from_extension(ext).unwrap_or_default();
            log::debug!("Found recording {}", path.display());
            return Ok(Some(AudioClip::new(bytes, format).named(file_name)));
        }
        Ok(None)
    }
}
