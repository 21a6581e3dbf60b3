use crate::shared::provider_error::ProviderError;

use super::speech_synthesizer::AudioClip;

/// A collection of recorded pronunciations by native speakers.
///
/// `Ok(None)` means the word simply is not in the collection.
pub trait PronunciationSource: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    fn find(&self, word: &str) -> Result<Option<AudioClip>, ProviderError>;
}
