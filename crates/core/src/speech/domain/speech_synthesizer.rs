use serde::{Deserialize, Serialize};

use crate::shared::provider_error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Wav,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Opus => "opus",
            AudioFormat::Wav => "wav",
        }
    }

    /// Maps a file extension back to a format. `ogg` is treated as Opus.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "opus" | "ogg" => Some(AudioFormat::Opus),
            "wav" => Some(AudioFormat::Wav),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub language: String,
}

/// Encoded audio plus an optional file name chosen by its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
    pub file_name: Option<String>,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            bytes,
            format,
            file_name: None,
        }
    }

    pub fn named(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The source's file name, or `<stem>.<ext>` from the clip's format.
    pub fn file_name_or(&self, stem: &str) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("{stem}.{}", self.format.extension()))
    }
}

/// Domain interface for text-to-speech.
///
/// Implementations may produce a different format than requested when their
/// backend only supports one; the returned clip records what was produced.
pub trait SpeechSynthesizer: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> String;

    fn is_available(&self) -> bool;

    /// Last known voice list; empty until [`refresh_voices`](Self::refresh_voices) succeeds.
    fn voices(&self) -> Vec<Voice>;

    fn refresh_voices(&self) -> Result<Vec<Voice>, ProviderError>;

    fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        language_code: &str,
        format: AudioFormat,
    ) -> Result<AudioClip, ProviderError>;
}
