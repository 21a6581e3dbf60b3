use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::analysis::sentence_analyzer::SentenceAnalyzer;
use crate::ocr::domain::ocr_provider::OcrOptions;
use crate::orchestration::task::{TaskFailure, TaskId};
use crate::orchestration::task_context::TaskKind;
use crate::orchestration::task_orchestrator::{CancelReport, TaskOrchestrator};
use crate::pipeline::flashcard::FlashcardDraft;
use crate::pipeline::process_sentence_use_case::{ProcessRequest, ProcessSentenceUseCase};
use crate::pipeline::scan_image_use_case::{ScanImageUseCase, ScanRequest};
use crate::pipeline::status_reporter::{ChannelStatusReporter, StatusReporter, StatusUpdate};
use crate::registry::provider_registry::{ProviderRegistry, SpeechRequest};
use crate::shared::image_payload::ImagePayload;
use crate::shared::model_selection::ModelSelection;
use crate::shared::provider_error::ProviderError;
use crate::shared::settings::Settings;
use crate::speech::domain::speech_synthesizer::Voice;

/// Something the control thread should react to, returned from [`CardSession::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ScanCompleted(String),
    ScanFailed(String),
    CardReady(Box<FlashcardDraft>),
    ProcessFailed(String),
    VoicesRefreshed(Vec<Voice>),
    VoiceRefreshFailed(String),
    Status(StatusUpdate),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Scan already in progress.")]
    ScanInProgress,
    #[error("Processing already in progress.")]
    ProcessInProgress,
    #[error("No speech synthesizer configured.")]
    NoSynthesizer,
    #[error("Invalid image: {0}")]
    InvalidImage(#[source] ProviderError),
}

/// Control-thread facade over the orchestrator and the two workflows.
///
/// Nothing here blocks on a worker. Call [`tick`](Self::tick) regularly to
/// deliver finished tasks and collect progress.
pub struct CardSession {
    orchestrator: TaskOrchestrator,
    providers: Arc<ProviderRegistry>,
    analyzer: Arc<SentenceAnalyzer>,
    settings: Settings,
    reporter: Arc<dyn StatusReporter>,
    status_rx: Receiver<StatusUpdate>,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
}

impl CardSession {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        analyzer: Arc<SentenceAnalyzer>,
        settings: Settings,
    ) -> Self {
        let (reporter, status_rx) = ChannelStatusReporter::new();
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        analyzer.set_preferred_translator(&settings.preferred_translator);
        Self {
            orchestrator: TaskOrchestrator::new(),
            providers,
            analyzer,
            settings,
            reporter: Arc::new(reporter),
            status_rx,
            events_tx,
            events_rx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies new preferences to work submitted from now on.
    pub fn update_settings(&mut self, settings: Settings) {
        self.analyzer
            .set_preferred_translator(&settings.preferred_translator);
        self.settings = settings;
    }

    // ── Submission ──

    /// Starts OCR on an image. Rejected while another scan is running.
    pub fn scan(&mut self, image_bytes: Vec<u8>) -> Result<TaskId, SessionError> {
        let image = ImagePayload::from_bytes(image_bytes).map_err(SessionError::InvalidImage)?;
        if !self.orchestrator.state().try_begin(TaskKind::Scan) {
            log::warn!("Scan already in progress.");
            return Err(SessionError::ScanInProgress);
        }

        let request = ScanRequest {
            image,
            method: self.settings.ocr_method,
            options: OcrOptions {
                orientation: self.settings.text_orientation,
                model: ModelSelection::parse(&self.settings.vision_model),
            },
        };
        let use_case = ScanImageUseCase::new(self.providers.clone(), self.reporter.clone());
        let done_tx = self.events_tx.clone();
        let fail_tx = self.events_tx.clone();

        Ok(self.orchestrator.submit(
            "OCR Image Processing",
            move |ctx| use_case.execute(&request, ctx),
            move |text, state| {
                state.finish(TaskKind::Scan);
                let _ = done_tx.send(SessionEvent::ScanCompleted(text));
            },
            move |failure, state| {
                state.finish(TaskKind::Scan);
                log::error!("OCR failed: {failure}");
                let _ = fail_tx.send(SessionEvent::ScanFailed(failure.to_string()));
            },
        ))
    }

    /// Starts building a card for `sentence`. Rejected while another card is being built.
    pub fn process(
        &mut self,
        sentence: impl Into<String>,
        target_word: Option<String>,
        image: Option<ImagePayload>,
    ) -> Result<TaskId, SessionError> {
        if !self.orchestrator.state().try_begin(TaskKind::Process) {
            log::warn!("Processing already in progress.");
            return Err(SessionError::ProcessInProgress);
        }

        let request = ProcessRequest {
            sentence: sentence.into(),
            target_word,
            image,
            speech: self.speech_request(),
        };
        let use_case = ProcessSentenceUseCase::new(
            self.analyzer.clone(),
            self.providers.clone(),
            self.reporter.clone(),
        );
        let done_tx = self.events_tx.clone();
        let fail_tx = self.events_tx.clone();

        Ok(self.orchestrator.submit(
            "Sentence Processing",
            move |ctx| use_case.execute(&request, ctx),
            move |draft, state| {
                state.finish(TaskKind::Process);
                let _ = done_tx.send(SessionEvent::CardReady(Box::new(draft)));
            },
            move |failure, state| {
                state.finish(TaskKind::Process);
                log::error!("Processing failed: {failure}");
                let _ = fail_tx.send(SessionEvent::ProcessFailed(failure.to_string()));
            },
        ))
    }

    /// Reloads the synthesizer's voice list on a worker.
    pub fn refresh_voices(&mut self) -> Result<TaskId, SessionError> {
        let synthesizer = self
            .providers
            .synthesizer()
            .cloned()
            .ok_or(SessionError::NoSynthesizer)?;
        let done_tx = self.events_tx.clone();
        let fail_tx = self.events_tx.clone();

        Ok(self.orchestrator.submit(
            "Voice List Refresh",
            move |ctx| {
                ctx.checkpoint("voice refresh")?;
                synthesizer.refresh_voices().map_err(TaskFailure::from)
            },
            move |voices, _state| {
                log::info!("Loaded {} voice(s)", voices.len());
                let _ = done_tx.send(SessionEvent::VoicesRefreshed(voices));
            },
            move |failure, _state| {
                log::warn!("Voice refresh failed: {failure}");
                let _ = fail_tx.send(SessionEvent::VoiceRefreshFailed(failure.to_string()));
            },
        ))
    }

    // ── Control loop ──

    /// Delivers finished tasks and returns everything that happened since the last tick.
    ///
    /// Status updates come first, then task outcomes in submission order.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        self.orchestrator.poll();
        let mut events: Vec<SessionEvent> =
            self.status_rx.try_iter().map(SessionEvent::Status).collect();
        events.extend(self.events_rx.try_iter());
        events
    }

    pub fn is_idle(&self) -> bool {
        self.orchestrator.is_empty()
    }

    pub fn is_busy(&self, kind: TaskKind) -> bool {
        self.orchestrator.state().is_busy(kind)
    }

    /// Cancels outstanding work, waiting up to the configured timeout per task.
    pub fn shutdown(&mut self) -> CancelReport {
        let report = self.orchestrator.cancel_all(self.settings.task_timeout());
        if !report.abandoned.is_empty() {
            log::warn!("Abandoned tasks: {}", report.abandoned.join(", "));
        }
        report
    }

    fn speech_request(&self) -> SpeechRequest {
        SpeechRequest {
            voice_id: self.settings.voice_id.clone(),
            language_code: self.settings.language_code.clone(),
            format: self.settings.audio_format,
        }
    }
}
