use std::sync::Arc;

use crate::analysis::analysis_result::AnalysisError;
use crate::analysis::sentence_analyzer::SentenceAnalyzer;
use crate::orchestration::task::{TaskFailure, WorkResult};
use crate::orchestration::task_context::CancellationProbe;
use crate::pipeline::flashcard::{CardMedia, FlashcardDraft};
use crate::pipeline::status_reporter::StatusReporter;
use crate::registry::provider_registry::{ProviderRegistry, SpeechRequest};
use crate::shared::image_payload::ImagePayload;

/// Everything one card build needs, captured when processing is requested.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub sentence: String,
    pub target_word: Option<String>,
    pub image: Option<ImagePayload>,
    pub speech: SpeechRequest,
}

/// Sentence to card: analyze → vocabulary audio → sentence audio.
///
/// Only analysis failures fail the run. Missing audio is recorded as a
/// warning on the draft.
pub struct ProcessSentenceUseCase {
    analyzer: Arc<SentenceAnalyzer>,
    providers: Arc<ProviderRegistry>,
    reporter: Arc<dyn StatusReporter>,
}

impl ProcessSentenceUseCase {
    pub fn new(
        analyzer: Arc<SentenceAnalyzer>,
        providers: Arc<ProviderRegistry>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            analyzer,
            providers,
            reporter,
        }
    }

    pub fn execute(
        &self,
        request: &ProcessRequest,
        probe: &dyn CancellationProbe,
    ) -> WorkResult<FlashcardDraft> {
        if probe.is_cancelled() {
            log::info!("Processing task cancelled before starting.");
            return Err(TaskFailure::Cancelled);
        }

        self.reporter.progress(0.1);
        self.reporter.status("Analyzing sentence...");
        let analysis = self
            .analyzer
            .analyze_sentence_with(&request.sentence, request.target_word.as_deref(), probe)
            .map_err(|e| match e {
                AnalysisError::Cancelled => TaskFailure::Cancelled,
                other => TaskFailure::failed(other),
            })?;
        self.reporter.progress(0.4);

        let mut draft = FlashcardDraft::new(analysis, request.image.as_ref());

        stop_if_cancelled(probe, "vocabulary audio")?;
        self.reporter.progress(0.6);
        self.reporter.status("Generating Vocab Audio...");
        match self
            .providers
            .fetch_pronunciation(&draft.analysis.target_word, &request.speech)
        {
            Ok(clip) => draft.vocabulary_audio = Some(CardMedia::from_audio(clip, "vocab")),
            Err(e) => {
                log::warn!("Vocabulary audio unavailable: {e}");
                draft.warnings.push(format!("Vocabulary audio: {e}"));
            }
        }

        stop_if_cancelled(probe, "sentence audio")?;
        self.reporter.progress(0.8);
        self.reporter.status("Generating Sentence Audio...");
        match self
            .providers
            .synthesize(&draft.analysis.sentence, &request.speech)
        {
            Ok(clip) => draft.sentence_audio = Some(CardMedia::from_audio(clip, "sentence")),
            Err(e) => {
                log::warn!("Sentence audio unavailable: {e}");
                draft.warnings.push(format!("Sentence audio: {e}"));
            }
        }

        self.reporter.progress(1.0);
        self.reporter.status("Processing complete.");
        Ok(draft)
    }
}

fn stop_if_cancelled(probe: &dyn CancellationProbe, stage: &str) -> WorkResult<()> {
    if probe.is_cancelled() {
        log::info!("Processing cancelled before {stage}");
        return Err(TaskFailure::Cancelled);
    }
    Ok(())
}
