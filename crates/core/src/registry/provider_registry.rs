use std::sync::Arc;

use crate::ocr::domain::ocr_provider::{OcrMethod, OcrOptions, OcrProvider};
use crate::shared::provider_error::ProviderError;
use crate::speech::domain::pronunciation_source::PronunciationSource;
use crate::speech::domain::speech_synthesizer::{AudioClip, AudioFormat, SpeechSynthesizer};
use crate::translation::domain::translator::Translator;

/// Voice settings for one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub voice_id: String,
    pub language_code: String,
    pub format: AudioFormat,
}

/// The registered capability providers and the policy for choosing among them.
///
/// Registration order matters: it is the fallback order for translators and
/// the lookup order for pronunciation sources.
#[derive(Default)]
pub struct ProviderRegistry {
    ocr: Vec<Arc<dyn OcrProvider>>,
    translators: Vec<Arc<dyn Translator>>,
    pronunciation_sources: Vec<Arc<dyn PronunciationSource>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_ocr(&mut self, provider: Arc<dyn OcrProvider>) {
        log::debug!("Registered OCR provider {}", provider.name());
        self.ocr.push(provider);
    }

    pub fn register_translator(&mut self, translator: Arc<dyn Translator>) {
        log::debug!("Registered translator '{}'", translator.id());
        self.translators.push(translator);
    }

    pub fn register_pronunciation_source(&mut self, source: Arc<dyn PronunciationSource>) {
        log::debug!("Registered pronunciation source {}", source.name());
        self.pronunciation_sources.push(source);
    }

    pub fn set_synthesizer(&mut self, synthesizer: Arc<dyn SpeechSynthesizer>) {
        log::debug!("Speech synthesizer set to {}", synthesizer.name());
        self.synthesizer = Some(synthesizer);
    }

    pub fn synthesizer(&self) -> Option<&Arc<dyn SpeechSynthesizer>> {
        self.synthesizer.as_ref()
    }

    pub fn translator_ids(&self) -> Vec<&str> {
        self.translators.iter().map(|t| t.id()).collect()
    }

    // ── OCR ──

    /// Returns the engine for `method`, configured with `options`.
    ///
    /// There is no fallback: a missing or uninitialized engine is an error
    /// even if another engine would work.
    pub fn select_ocr(
        &self,
        method: OcrMethod,
        options: &OcrOptions,
    ) -> Result<Arc<dyn OcrProvider>, ProviderError> {
        let provider = self
            .ocr
            .iter()
            .find(|p| p.method() == method)
            .ok_or_else(|| ProviderError::Unavailable(method.label().to_string()))?;
        if !provider.is_initialized() {
            return Err(ProviderError::Unavailable(provider.name()));
        }
        provider.configure(options);
        log::info!("Using {} for OCR", provider.name());
        Ok(provider.clone())
    }

    // ── Translation ──

    /// The preferred translator if registered and available, else the first
    /// available one in registration order, else `None`.
    pub fn select_translator(&self, preferred: &str) -> Option<Arc<dyn Translator>> {
        if !preferred.is_empty() {
            if let Some(t) = self
                .translators
                .iter()
                .find(|t| t.id() == preferred && t.is_available())
            {
                log::info!("Using preferred '{}' translator", t.id());
                return Some(t.clone());
            }
            log::warn!(
                "Preferred translator '{preferred}' not found or not available, falling back to first available"
            );
        }

        match self.translators.iter().find(|t| t.is_available()) {
            Some(t) => {
                log::info!("Using first available '{}' translator", t.id());
                Some(t.clone())
            }
            None => {
                log::warn!("No available translators found");
                None
            }
        }
    }

    /// Translates with the selected translator; no translator means an empty result.
    pub fn translate(&self, preferred: &str, text: &str) -> Result<String, ProviderError> {
        match self.select_translator(preferred) {
            Some(translator) => translator.translate(text),
            None => Ok(String::new()),
        }
    }

    // ── Pronunciation ──

    /// Recorded audio for `word` if any source has it, otherwise synthesized audio.
    ///
    /// Source errors count as "no recording". The synthesizer is called at
    /// most once and only when no recording was found.
    pub fn fetch_pronunciation(
        &self,
        word: &str,
        request: &SpeechRequest,
    ) -> Result<AudioClip, ProviderError> {
        for source in self.pronunciation_sources.iter().filter(|s| s.is_available()) {
            match source.find(word) {
                Ok(Some(clip)) if !clip.is_empty() => {
                    log::info!("Using {} audio for '{word}'", source.name());
                    return Ok(clip);
                }
                Ok(_) => log::debug!("{} has no audio for '{word}'", source.name()),
                Err(e) => log::warn!("{} lookup failed: {e}, falling back", source.name()),
            }
        }

        log::info!("Synthesizing audio for '{word}'");
        self.synthesize(word, request)
    }

    pub fn synthesize(&self, text: &str, request: &SpeechRequest) -> Result<AudioClip, ProviderError> {
        let synthesizer = self
            .synthesizer
            .as_ref()
            .filter(|s| s.is_available())
            .ok_or_else(|| ProviderError::Unavailable("Speech synthesis".to_string()))?;
        synthesizer.synthesize(text, &request.voice_id, &request.language_code, request.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::domain::ocr_provider::TextOrientation;
    use crate::test_support::{
        MockOcr, MockPronunciationSource, MockSynthesizer, MockTranslator, SourceBehavior,
    };

    fn request() -> SpeechRequest {
        SpeechRequest {
            voice_id: "ja".into(),
            language_code: "ja".into(),
            format: AudioFormat::Mp3,
        }
    }

    // ── OCR ──

    #[test]
    fn test_select_ocr_applies_options() {
        let tesseract = Arc::new(MockOcr::new(OcrMethod::Tesseract, true, "text"));
        let mut registry = ProviderRegistry::new();
        registry.register_ocr(tesseract.clone());

        let options = OcrOptions {
            orientation: TextOrientation::Vertical,
            model: None,
        };
        let provider = registry.select_ocr(OcrMethod::Tesseract, &options).unwrap();

        assert_eq!(provider.method(), OcrMethod::Tesseract);
        assert_eq!(tesseract.configured(), Some(options));
    }

    #[test]
    fn test_unavailable_ocr_never_falls_back() {
        let tesseract = Arc::new(MockOcr::new(OcrMethod::Tesseract, true, "text"));
        let remote = Arc::new(MockOcr::new(OcrMethod::Remote, false, "text"));
        let mut registry = ProviderRegistry::new();
        registry.register_ocr(tesseract.clone());
        registry.register_ocr(remote);

        let err = registry
            .select_ocr(OcrMethod::Remote, &OcrOptions::default())
            .err()
            .unwrap();
        assert!(err.is_unavailable());

        let err = registry
            .select_ocr(OcrMethod::Native, &OcrOptions::default())
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Native OCR is not available");

        assert_eq!(tesseract.calls(), 0);
        assert_eq!(tesseract.configured(), None);
    }

    // ── Translation ──

    #[test]
    fn test_preferred_translator_used_when_available() {
        let mut registry = ProviderRegistry::new();
        registry.register_translator(Arc::new(MockTranslator::new("a", true, Ok("A"))));
        registry.register_translator(Arc::new(MockTranslator::new("b", true, Ok("B"))));

        assert_eq!(registry.translate("b", "文").unwrap(), "B");
    }

    #[test]
    fn test_unavailable_preferred_falls_back_to_first_available() {
        let mut registry = ProviderRegistry::new();
        registry.register_translator(Arc::new(MockTranslator::new("a", false, Ok("A"))));
        registry.register_translator(Arc::new(MockTranslator::new("b", true, Ok("B"))));
        registry.register_translator(Arc::new(MockTranslator::new("c", true, Ok("C"))));

        assert_eq!(registry.translate("a", "文").unwrap(), "B");
        assert_eq!(registry.translate("missing", "文").unwrap(), "B");
        assert_eq!(registry.translate("", "文").unwrap(), "B");
    }

    #[test]
    fn test_no_available_translator_yields_empty() {
        let mut registry = ProviderRegistry::new();
        registry.register_translator(Arc::new(MockTranslator::new("a", false, Ok("A"))));

        assert!(registry.select_translator("a").is_none());
        assert_eq!(registry.translate("a", "文").unwrap(), "");
    }

    // ── Pronunciation ──

    fn pronunciation_registry(
        behavior: SourceBehavior,
    ) -> (ProviderRegistry, Arc<MockPronunciationSource>, Arc<MockSynthesizer>) {
        let source = Arc::new(MockPronunciationSource::new(behavior));
        let synth = Arc::new(MockSynthesizer::new(true));
        let mut registry = ProviderRegistry::new();
        registry.register_pronunciation_source(source.clone());
        registry.set_synthesizer(synth.clone());
        (registry, source, synth)
    }

    #[test]
    fn test_recording_found_skips_synthesis() {
        let (registry, source, synth) = pronunciation_registry(SourceBehavior::Found);

        let clip = registry.fetch_pronunciation("読む", &request()).unwrap();

        assert_eq!(clip.file_name.as_deref(), Some("読む.mp3"));
        assert_eq!(source.calls(), 1);
        assert_eq!(synth.calls(), 0);
    }

    #[rstest::rstest]
    #[case::empty(SourceBehavior::Empty)]
    #[case::missing(SourceBehavior::Missing)]
    #[case::error(SourceBehavior::Fails)]
    fn test_no_recording_synthesizes_exactly_once(#[case] behavior: SourceBehavior) {
        let (registry, source, synth) = pronunciation_registry(behavior);

        let clip = registry.fetch_pronunciation("読む", &request()).unwrap();

        assert!(clip.file_name.is_none());
        assert_eq!(source.calls(), 1);
        assert_eq!(synth.calls(), 1);
        assert_eq!(synth.last_text().as_deref(), Some("読む"));
    }

    #[test]
    fn test_missing_synthesizer_is_unavailable() {
        let registry = ProviderRegistry::new();
        assert!(registry
            .fetch_pronunciation("読む", &request())
            .unwrap_err()
            .is_unavailable());
    }
}
