use std::sync::Arc;

use crate::language::domain::kana;
use crate::ocr::domain::ocr_provider::{OcrMethod, OcrOptions};
use crate::orchestration::task::{TaskFailure, WorkResult};
use crate::orchestration::task_context::CancellationProbe;
use crate::pipeline::status_reporter::StatusReporter;
use crate::registry::provider_registry::ProviderRegistry;
use crate::shared::image_payload::ImagePayload;

/// Everything one OCR run needs, captured when the scan is requested.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub image: ImagePayload,
    pub method: OcrMethod,
    pub options: OcrOptions,
}

/// Image to sentence: select engine → extract → clean up.
pub struct ScanImageUseCase {
    providers: Arc<ProviderRegistry>,
    reporter: Arc<dyn StatusReporter>,
}

impl ScanImageUseCase {
    pub fn new(providers: Arc<ProviderRegistry>, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            providers,
            reporter,
        }
    }

    pub fn execute(&self, request: &ScanRequest, probe: &dyn CancellationProbe) -> WorkResult<String> {
        if probe.is_cancelled() {
            log::info!("OCR task cancelled before starting.");
            return Err(TaskFailure::Cancelled);
        }
        self.reporter.progress(0.0);
        self.reporter.status("Scanning image...");

        let provider = self
            .providers
            .select_ocr(request.method, &request.options)
            .map_err(|e| TaskFailure::failed(format!("OCR failed: {e}")))?;
        let raw = provider
            .extract_text(&request.image)
            .map_err(|e| TaskFailure::failed(format!("OCR failed: {e}")))?;

        let text = clean_ocr_text(&raw);
        log::info!("OCR Result: {text}");
        if text.is_empty() {
            return Err(TaskFailure::failed("OCR returned no text."));
        }
        Ok(text)
    }
}

/// Joins OCR lines into one sentence.
///
/// Whitespace runs are dropped when either neighbour is CJK, since OCR
/// engines put spaces between Japanese characters and line breaks inside
/// sentences. Between two non-CJK characters a run becomes one space.
pub fn clean_ocr_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            let previous_is_cjk = out.chars().next_back().is_some_and(is_cjk);
            if !previous_is_cjk && !is_cjk(c) {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }
    out
}

fn is_cjk(c: char) -> bool {
    kana::is_kana(c)
        || kana::is_kanji(c)
        || ('\u{3000}'..='\u{303F}').contains(&c)
        || ('\u{FF00}'..='\u{FFEF}').contains(&c)
}
