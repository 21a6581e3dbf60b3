use crate::shared::image_payload::ImagePayload;
use crate::shared::provider_error::ProviderError;

/// A multimodal model backend that can read text out of an image.
///
/// Only the minimal contract is modelled: image and instruction in, text out.
/// Wire formats and credentials belong to the implementation.
pub trait VisionClient: Send + Sync {
    /// Short id used to match the provider part of a model selection.
    fn id(&self) -> &str;

    fn is_available(&self) -> bool;

    fn read_text(
        &self,
        model: &str,
        instruction: &str,
        image: &ImagePayload,
    ) -> Result<String, ProviderError>;
}
