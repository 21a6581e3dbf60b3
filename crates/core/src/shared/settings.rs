use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ocr::domain::ocr_provider::{OcrMethod, TextOrientation};
use crate::speech::domain::speech_synthesizer::AudioFormat;

use super::constants::{DEFAULT_LANGUAGE_CODE, DEFAULT_TASK_TIMEOUT};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User preferences that drive provider selection and audio generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ocr_method: OcrMethod,
    pub text_orientation: TextOrientation,
    /// Remote vision model as `"Provider/model"`.
    pub vision_model: String,
    pub preferred_translator: String,
    pub voice_id: String,
    pub language_code: String,
    pub audio_format: AudioFormat,
    pub task_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ocr_method: OcrMethod::Tesseract,
            text_orientation: TextOrientation::Horizontal,
            vision_model: String::new(),
            preferred_translator: String::new(),
            voice_id: String::new(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            audio_format: AudioFormat::Mp3,
            task_timeout_secs: DEFAULT_TASK_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("CardScan").join("settings.json"))
    }

    /// Loads the user's settings, falling back to defaults on any problem.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable settings: {e}");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }
}
