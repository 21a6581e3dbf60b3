use std::time::Duration;

/// Opening/closing markup wrapped around the highlighted target word.
pub const HIGHLIGHT_OPEN: &str = "<b style=\"color: green;\">";
pub const HIGHLIGHT_CLOSE: &str = "</b>";

/// Target word used when the sentence yields no usable token at all.
pub const FALLBACK_TARGET_WORD: &str = "詞";

/// Parts of speech (IPADIC naming) treated as content words when picking a target.
pub const CONTENT_PARTS_OF_SPEECH: &[&str] = &["名詞", "動詞", "形容詞"];

/// How long shutdown waits on each queued task before abandoning it.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeouts for plain HTTP downloads of community pronunciation audio.
pub const PRONUNCIATION_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const PRONUNCIATION_READ_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_LANGUAGE_CODE: &str = "ja";
pub const TESSERACT_PROGRAM: &str = "tesseract";
pub const ESPEAK_PROGRAM: &str = "espeak-ng";
pub const MECAB_PROGRAM: &str = "mecab";

pub const PRONUNCIATION_EXTENSIONS: &[&str] = &["mp3", "ogg", "opus", "wav"];
