//! Counting mock collaborators shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::language::domain::annotation_generator::AnnotationGenerator;
use crate::language::domain::dictionary::{Dictionary, DictionaryEntry};
use crate::language::domain::pitch_accent::{PitchAccentEntry, PitchAccentStore};
use crate::language::domain::tokenizer::{Token, Tokenizer};
use crate::ocr::domain::ocr_provider::{OcrMethod, OcrOptions, OcrProvider};
use crate::shared::image_payload::ImagePayload;
use crate::shared::provider_error::ProviderError;
use crate::speech::domain::pronunciation_source::PronunciationSource;
use crate::speech::domain::speech_synthesizer::{AudioClip, AudioFormat, SpeechSynthesizer, Voice};
use crate::translation::domain::translator::Translator;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

pub fn token(surface: &str, part_of_speech: &str, dictionary_form: &str, reading: &str) -> Token {
    Token {
        surface: surface.into(),
        part_of_speech: part_of_speech.into(),
        dictionary_form: dictionary_form.into(),
        reading: reading.into(),
    }
}

fn broken(provider: &str) -> ProviderError {
    ProviderError::failed(provider, "simulated failure")
}

// ── Tokenizer ──

/// Tokens per exact input; unknown inputs become one noun token.
#[derive(Default)]
pub struct MockTokenizer {
    analyses: HashMap<String, Vec<Token>>,
    fail_analyze: bool,
    fail_forms: bool,
    calls: AtomicUsize,
}

impl MockTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, tokens: Vec<Token>) -> Self {
        self.analyses.insert(text.to_string(), tokens);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_analyze: true,
            fail_forms: true,
            ..Self::default()
        }
    }

    /// `analyze` works, `dictionary_form` and `reading` fail.
    pub fn failing_forms(mut self) -> Self {
        self.fail_forms = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Tokenizer for MockTokenizer {
    fn analyze(&self, sentence: &str) -> Result<Vec<Token>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_analyze {
            return Err(broken("tokenizer"));
        }
        Ok(self
            .analyses
            .get(sentence)
            .cloned()
            .unwrap_or_else(|| vec![token(sentence, "名詞", sentence, "")]))
    }

    fn dictionary_form(&self, word: &str) -> Result<String, ProviderError> {
        if self.fail_forms {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(broken("tokenizer"));
        }
        let tokens = self.analyze(word)?;
        Ok(tokens
            .first()
            .map(|t| t.dictionary_form.clone())
            .unwrap_or_else(|| word.to_string()))
    }

    fn reading(&self, word: &str) -> Result<String, ProviderError> {
        if self.fail_forms {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(broken("tokenizer"));
        }
        let tokens = self.analyze(word)?;
        Ok(tokens.iter().map(|t| t.reading.as_str()).collect())
    }
}

// ── Annotation ──

#[derive(Default)]
pub struct MockAnnotator {
    annotations: HashMap<String, String>,
    failing: bool,
    calls: AtomicUsize,
}

impl MockAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, annotated: &str) -> Self {
        self.annotations.insert(text.to_string(), annotated.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn annotate(&self, text: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(broken("annotator"));
        }
        Ok(self
            .annotations
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}

impl AnnotationGenerator for MockAnnotator {
    fn generate(&self, sentence: &str) -> Result<String, ProviderError> {
        self.annotate(sentence)
    }

    fn generate_for_word(&self, word: &str) -> Result<String, ProviderError> {
        self.annotate(word)
    }
}

// ── Dictionary ──

#[derive(Default)]
pub struct MockDictionary {
    definitions: HashMap<String, String>,
    failing: bool,
    calls: AtomicUsize,
}

impl MockDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, headword: &str, definition: &str) -> Self {
        self.definitions
            .insert(headword.to_string(), definition.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Dictionary for MockDictionary {
    fn lookup(
        &self,
        surface: &str,
        dictionary_form: &str,
    ) -> Result<Option<DictionaryEntry>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(broken("dictionary"));
        }
        Ok(self
            .definitions
            .get(surface)
            .or_else(|| self.definitions.get(dictionary_form))
            .map(|definition| DictionaryEntry {
                definition: definition.clone(),
                part_of_speech: String::new(),
            }))
    }
}

// ── Pitch accent ──

#[derive(Default)]
pub struct MockPitchStore {
    entries: HashMap<(String, String), Vec<PitchAccentEntry>>,
    failing: bool,
    lookups: Mutex<Vec<(String, String)>>,
}

impl MockPitchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, headword: &str, reading: &str, downstep: usize) -> Self {
        self.entries
            .entry((headword.to_string(), reading.to_string()))
            .or_default()
            .push(PitchAccentEntry {
                headword: headword.to_string(),
                reading: reading.to_string(),
                downstep,
            });
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().unwrap().clone()
    }
}

impl PitchAccentStore for MockPitchStore {
    fn lookup(&self, headword: &str, reading: &str) -> Result<Vec<PitchAccentEntry>, ProviderError> {
        self.lookups
            .lock()
            .unwrap()
            .push((headword.to_string(), reading.to_string()));
        if self.failing {
            return Err(broken("pitch accent store"));
        }
        Ok(self
            .entries
            .get(&(headword.to_string(), reading.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

// ── Translation ──

pub struct MockTranslator {
    id: String,
    available: bool,
    result: Result<String, String>,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(id: &str, available: bool, result: Result<&str, &str>) -> Self {
        Self {
            id: id.to_string(),
            available,
            result: result.map(str::to_string).map_err(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Translator for MockTranslator {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn translate(&self, _text: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .map_err(|message| ProviderError::failed(&self.id, message))
    }
}

// ── OCR ──

pub struct MockOcr {
    method: OcrMethod,
    initialized: bool,
    result: Result<String, String>,
    configured: Mutex<Option<OcrOptions>>,
    calls: AtomicUsize,
}

impl MockOcr {
    pub fn new(method: OcrMethod, initialized: bool, text: &str) -> Self {
        Self {
            method,
            initialized,
            result: Ok(text.to_string()),
            configured: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(method: OcrMethod, message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            ..Self::new(method, true, "")
        }
    }

    pub fn configured(&self) -> Option<OcrOptions> {
        self.configured.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrProvider for MockOcr {
    fn method(&self) -> OcrMethod {
        self.method
    }

    fn name(&self) -> String {
        format!("mock {}", self.method.label())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn configure(&self, options: &OcrOptions) {
        *self.configured.lock().unwrap() = Some(options.clone());
    }

    fn extract_text(&self, _image: &ImagePayload) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .map_err(|message| ProviderError::failed(self.name(), message))
    }
}

// ── Speech ──

pub struct MockSynthesizer {
    available: bool,
    failing: bool,
    texts: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            failing: false,
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new(true)
        }
    }

    pub fn calls(&self) -> usize {
        self.texts.lock().unwrap().len()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> String {
        "Mock TTS".to_string()
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn refresh_voices(&self) -> Result<Vec<Voice>, ProviderError> {
        if self.failing {
            return Err(broken("Mock TTS"));
        }
        Ok(vec![Voice {
            id: "ja".into(),
            name: "Japanese".into(),
            language: "ja".into(),
        }])
    }

    fn synthesize(
        &self,
        text: &str,
        _voice_id: &str,
        _language_code: &str,
        format: AudioFormat,
    ) -> Result<AudioClip, ProviderError> {
        self.texts.lock().unwrap().push(text.to_string());
        if self.failing {
            return Err(broken("Mock TTS"));
        }
        Ok(AudioClip::new(text.as_bytes().to_vec(), format))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SourceBehavior {
    Found,
    Empty,
    Missing,
    Fails,
}

pub struct MockPronunciationSource {
    behavior: SourceBehavior,
    calls: AtomicUsize,
}

impl MockPronunciationSource {
    pub fn new(behavior: SourceBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PronunciationSource for MockPronunciationSource {
    fn name(&self) -> &str {
        "mock recordings"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn find(&self, word: &str) -> Result<Option<AudioClip>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            SourceBehavior::Found => Ok(Some(
                AudioClip::new(b"ID3".to_vec(), AudioFormat::Mp3).named(format!("{word}.mp3")),
            )),
            SourceBehavior::Empty => Ok(Some(AudioClip::new(Vec::new(), AudioFormat::Mp3))),
            SourceBehavior::Missing => Ok(None),
            SourceBehavior::Fails => Err(broken("mock recordings")),
        }
    }
}
