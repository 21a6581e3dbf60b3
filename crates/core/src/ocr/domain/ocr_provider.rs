use serde::{Deserialize, Serialize};

use crate::shared::image_payload::ImagePayload;
use crate::shared::model_selection::ModelSelection;
use crate::shared::provider_error::ProviderError;

/// OCR engine chosen explicitly by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrMethod {
    Tesseract,
    Native,
    Remote,
}

impl OcrMethod {
    pub fn label(self) -> &'static str {
        match self {
            OcrMethod::Tesseract => "Tesseract",
            OcrMethod::Native => "Native OCR",
            OcrMethod::Remote => "Remote vision",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Runtime configuration applied to an engine right before it is invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrOptions {
    pub orientation: TextOrientation,
    pub model: Option<ModelSelection>,
}

/// Domain interface for text extraction from an image.
///
/// Providers are shared between tasks, so configuration goes through `&self`
/// and interior mutability. Callers must not run two differently configured
/// extractions against one instance at the same time.
pub trait OcrProvider: Send + Sync {
    fn method(&self) -> OcrMethod;

    fn name(&self) -> String;

    fn is_initialized(&self) -> bool;

    fn configure(&self, _options: &OcrOptions) {}

    fn extract_text(&self, image: &ImagePayload) -> Result<String, ProviderError>;
}
