use serde::Serialize;

use crate::analysis::analysis_result::SentenceAnalysis;
use crate::shared::image_payload::ImagePayload;
use crate::speech::domain::speech_synthesizer::AudioClip;

/// A file attached to a card. Only the file name is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardMedia {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl CardMedia {
    pub fn from_image(image: &ImagePayload) -> Self {
        Self {
            file_name: format!("image.{}", image.extension()),
            bytes: image.bytes().to_vec(),
        }
    }

    /// Uses the clip's own file name when its source chose one.
    pub fn from_audio(clip: AudioClip, stem: &str) -> Self {
        Self {
            file_name: clip.file_name_or(stem),
            bytes: clip.bytes,
        }
    }
}

/// Everything produced for one card, ready to hand to a storage client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashcardDraft {
    #[serde(flatten)]
    pub analysis: SentenceAnalysis,
    pub image: Option<CardMedia>,
    pub vocabulary_audio: Option<CardMedia>,
    pub sentence_audio: Option<CardMedia>,
    /// Non-fatal problems outside the analysis, e.g. audio that could not be made.
    pub warnings: Vec<String>,
}

impl FlashcardDraft {
    pub fn new(analysis: SentenceAnalysis, image: Option<&ImagePayload>) -> Self {
        Self {
            analysis,
            image: image.map(CardMedia::from_image),
            vocabulary_audio: None,
            sentence_audio: None,
            warnings: Vec::new(),
        }
    }

    /// Attached files in card order: image, vocabulary audio, sentence audio.
    pub fn media(&self) -> impl Iterator<Item = &CardMedia> {
        [&self.image, &self.vocabulary_audio, &self.sentence_audio]
            .into_iter()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::domain::speech_synthesizer::AudioFormat;
    use crate::test_support::PNG_BYTES;

    #[test]
    fn test_media_names() {
        let image = ImagePayload::from_bytes(PNG_BYTES.to_vec()).unwrap();
        let mut draft = FlashcardDraft::new(SentenceAnalysis::default(), Some(&image));
        draft.vocabulary_audio = Some(CardMedia::from_audio(
            AudioClip::new(vec![1], AudioFormat::Mp3).named("読む.mp3"),
            "vocab",
        ));
        draft.sentence_audio = Some(CardMedia::from_audio(
            AudioClip::new(vec![2], AudioFormat::Wav),
            "sentence",
        ));

        let names: Vec<&str> = draft.media().map(|m| m.file_name.as_str()).collect();
        assert_eq!(names, vec!["image.png", "読む.mp3", "sentence.wav"]);
    }

    #[test]
    fn test_serializes_analysis_fields_flat_without_bytes() {
        let analysis = SentenceAnalysis {
            target_word: "読む".into(),
            ..SentenceAnalysis::default()
        };
        let mut draft = FlashcardDraft::new(analysis, None);
        draft.sentence_audio = Some(CardMedia {
            file_name: "sentence.mp3".into(),
            bytes: vec![9; 4],
        });

        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["target_word"], "読む");
        assert_eq!(json["sentence_audio"]["file_name"], "sentence.mp3");
        assert!(json["sentence_audio"].get("bytes").is_none());
        assert!(json["image"].is_null());
    }
}
