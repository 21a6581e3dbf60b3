use std::sync::{Arc, Mutex, PoisonError};

use crate::ocr::domain::ocr_provider::{OcrMethod, OcrOptions, OcrProvider, TextOrientation};
use crate::ocr::domain::vision_client::VisionClient;
use crate::shared::image_payload::ImagePayload;
use crate::shared::model_selection::ModelSelection;
use crate::shared::provider_error::ProviderError;

const HORIZONTAL_INSTRUCTION: &str = "Transcribe all Japanese text in this image exactly as written. \
     Return only the text, without translation, romanization or commentary.";
const VERTICAL_INSTRUCTION: &str = "Transcribe all Japanese text in this image exactly as written. \
     The text is vertical: read columns top to bottom, right to left. \
     Return only the text, without translation, romanization or commentary.";

/// OCR delegated to a multimodal model.
///
/// The provider part of the active [`ModelSelection`] picks one of the
/// registered clients; when it names none of them the first client is used.
pub struct RemoteVisionOcr {
    clients: Vec<Arc<dyn VisionClient>>,
    config: Mutex<OcrOptions>,
}

impl RemoteVisionOcr {
    pub fn new(clients: Vec<Arc<dyn VisionClient>>) -> Self {
        Self {
            clients,
            config: Mutex::new(OcrOptions::default()),
        }
    }

    fn current(&self) -> OcrOptions {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn client_for(&self, selection: Option<&ModelSelection>) -> Option<&Arc<dyn VisionClient>> {
        selection
            .and_then(|s| self.clients.iter().find(|c| s.targets(c.id())))
            .or_else(|| self.clients.first())
    }
}

impl OcrProvider for RemoteVisionOcr {
    fn method(&self) -> OcrMethod {
        OcrMethod::Remote
    }

    fn name(&self) -> String {
        match self.client_for(self.current().model.as_ref()) {
            Some(client) => format!("{} (vision)", client.id()),
            None => "Remote vision".to_string(),
        }
    }

    fn is_initialized(&self) -> bool {
        self.clients.iter().any(|c| c.is_available())
    }

    fn configure(&self, options: &OcrOptions) {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = options.clone();
    }

    fn extract_text(&self, image: &ImagePayload) -> Result<String, ProviderError> {
        let options = self.current();
        let client = self
            .client_for(options.model.as_ref())
            .ok_or_else(|| ProviderError::Unavailable("Remote vision OCR".to_string()))?;
        let model = options
            .model
            .as_ref()
            .map(ModelSelection::model)
            .unwrap_or_default();
        let instruction = match options.orientation {
            TextOrientation::Horizontal => HORIZONTAL_INSTRUCTION,
            TextOrientation::Vertical => VERTICAL_INSTRUCTION,
        };

        log::info!(
            "Sending {} image ({} bytes) to {} model '{model}'",
            image.mime_type(),
            image.len(),
            client.id()
        );
        client.read_text(model, instruction, image)
    }
}
