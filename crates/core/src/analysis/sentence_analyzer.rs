use std::sync::{Arc, Mutex, PoisonError};

use crate::language::domain::annotation_generator::AnnotationGenerator;
use crate::language::domain::dictionary::Dictionary;
use crate::language::domain::pitch_accent::PitchAccentStore;
use crate::language::domain::tokenizer::Tokenizer;
use crate::orchestration::task_context::{CancellationProbe, NeverCancelled};
use crate::registry::provider_registry::ProviderRegistry;
use crate::shared::constants::FALLBACK_TARGET_WORD;
use crate::shared::provider_error::ProviderError;

use super::analysis_result::{AnalysisError, SentenceAnalysis};
use super::stage_outcome::{Stage, StageError, StageOutcome};
use super::word_highlighter::WordHighlighter;

/// Turns a sentence and an optional focus word into flashcard fields.
///
/// The tokenizer and the annotation generator are required; without them
/// the analyzer is not ready. Dictionary, pitch accents and translation are
/// optional: a missing or failing collaborator only empties its own field.
#[derive(Default)]
pub struct SentenceAnalyzer {
    tokenizer: Option<Arc<dyn Tokenizer>>,
    annotator: Option<Arc<dyn AnnotationGenerator>>,
    dictionary: Option<Arc<dyn Dictionary>>,
    pitch_accents: Option<Arc<dyn PitchAccentStore>>,
    providers: Option<Arc<ProviderRegistry>>,
    preferred_translator: Mutex<String>,
    highlighter: WordHighlighter,
}

impl SentenceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_annotator(mut self, annotator: Arc<dyn AnnotationGenerator>) -> Self {
        self.annotator = Some(annotator);
        self
    }

    pub fn with_dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn with_pitch_accents(mut self, store: Arc<dyn PitchAccentStore>) -> Self {
        self.pitch_accents = Some(store);
        self
    }

    pub fn with_providers(mut self, providers: Arc<ProviderRegistry>) -> Self {
        self.providers = Some(providers);
        self
    }

    pub fn with_highlighter(mut self, highlighter: WordHighlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn set_preferred_translator(&self, translator_id: &str) {
        log::info!("Preferred translator set to '{translator_id}'");
        *self
            .preferred_translator
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = translator_id.to_string();
    }

    pub fn is_ready(&self) -> bool {
        self.tokenizer.is_some() && self.annotator.is_some()
    }

    pub fn analyze_sentence(
        &self,
        sentence: &str,
        target_word: Option<&str>,
    ) -> Result<SentenceAnalysis, AnalysisError> {
        self.analyze_sentence_with(sentence, target_word, &NeverCancelled)
    }

    /// Runs all stages, checking `probe` before the translation request.
    pub fn analyze_sentence_with(
        &self,
        sentence: &str,
        target_word: Option<&str>,
        probe: &dyn CancellationProbe,
    ) -> Result<SentenceAnalysis, AnalysisError> {
        if sentence.trim().is_empty() {
            return Err(AnalysisError::EmptySentence);
        }
        let (Some(tokenizer), Some(annotator)) = (&self.tokenizer, &self.annotator) else {
            return Err(AnalysisError::NotReady);
        };
        if probe.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        let mut errors: Vec<StageError> = Vec::new();

        // 1. Focus word.
        let focus = match target_word.map(str::trim).filter(|w| !w.is_empty()) {
            Some(word) => word.to_string(),
            None => {
                let selected = StageOutcome::from_result(
                    Stage::TargetSelection,
                    select_target_word(tokenizer.as_ref(), sentence),
                    String::new,
                )
                .merge_into(&mut errors);
                if selected.is_empty() {
                    log::warn!("Could not determine target word for sentence: {sentence}");
                    FALLBACK_TARGET_WORD.to_string()
                } else {
                    selected
                }
            }
        };
        log::debug!("Analyzing '{sentence}' with focus word '{focus}'");

        // 2. Sentence annotation.
        let annotated = StageOutcome::from_result(Stage::Annotation, annotator.generate(sentence), || {
            sentence.to_string()
        })
        .merge_into(&mut errors);

        // 3. Lemma and reading.
        let dictionary_form = StageOutcome::from_result(
            Stage::DictionaryForm,
            tokenizer.dictionary_form(&focus),
            || focus.clone(),
        )
        .merge_into(&mut errors);
        let dictionary_form = if dictionary_form.is_empty() {
            focus.clone()
        } else {
            dictionary_form
        };
        let reading = StageOutcome::from_result(Stage::Reading, tokenizer.reading(&focus), || {
            focus.clone()
        })
        .merge_into(&mut errors);

        // 4. Target word annotation.
        let target_word_annotation = if reading.is_empty() {
            dictionary_form.clone()
        } else {
            StageOutcome::from_result(
                Stage::WordAnnotation,
                annotator.generate_for_word(&dictionary_form),
                || dictionary_form.clone(),
            )
            .merge_into(&mut errors)
        };

        // 5. Definition.
        let definition = match &self.dictionary {
            Some(dictionary) => StageOutcome::from_result(
                Stage::Definition,
                dictionary
                    .lookup(&focus, &dictionary_form)
                    .map(|entry| entry.map(|e| e.definition).unwrap_or_default()),
                String::new,
            )
            .merge_into(&mut errors),
            None => String::new(),
        };

        // 6. Translation.
        if probe.is_cancelled() {
            log::info!("Analysis cancelled before translation");
            return Err(AnalysisError::Cancelled);
        }
        let translation = match &self.providers {
            Some(providers) => {
                let preferred = self
                    .preferred_translator
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                StageOutcome::from_result(
                    Stage::Translation,
                    providers.translate(&preferred, sentence),
                    String::new,
                )
                .merge_into(&mut errors)
            }
            None => String::new(),
        };

        // 7. Pitch accent.
        let pitch_accent_markup = match &self.pitch_accents {
            Some(store) => StageOutcome::from_result(
                Stage::PitchAccent,
                lookup_pitch_accent(store.as_ref(), &dictionary_form, &reading),
                String::new,
            )
            .merge_into(&mut errors),
            None => String::new(),
        };

        // 8. Highlighting.
        let highlighted_sentence = self.highlighter.highlight(sentence, &focus);
        let highlighted_annotated_sentence = self.highlighter.highlight(&annotated, &focus);

        Ok(SentenceAnalysis {
            sentence: sentence.to_string(),
            highlighted_sentence,
            highlighted_annotated_sentence,
            translation,
            target_word: dictionary_form,
            target_word_reading: reading,
            target_word_annotation,
            definition,
            pitch_accent_markup,
            degraded_stages: errors,
        })
    }
}

/// First content word, else the first non-empty token, else empty.
fn select_target_word(tokenizer: &dyn Tokenizer, sentence: &str) -> Result<String, ProviderError> {
    let tokens = tokenizer.analyze(sentence)?;
    let surfaces = || tokens.iter().filter(|t| !t.surface.trim().is_empty());
    Ok(surfaces()
        .find(|t| t.is_content_word())
        .or_else(|| surfaces().next())
        .map(|t| t.surface.clone())
        .unwrap_or_default())
}

/// Looks up by (lemma, reading); when that finds nothing, retries once
/// by (reading, reading) for words stored under their kana spelling.
fn lookup_pitch_accent(
    store: &dyn PitchAccentStore,
    headword: &str,
    reading: &str,
) -> Result<String, ProviderError> {
    let mut entries = store.lookup(headword, reading)?;
    if entries.is_empty() && !reading.is_empty() {
        entries = store.lookup(reading, reading)?;
    }
    Ok(store.format_as_markup(&entries))
}
