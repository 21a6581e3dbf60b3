use crate::shared::provider_error::ProviderError;

/// Domain interface for sentence translation.
pub trait Translator: Send + Sync {
    /// Stable id matched against the user's preferred translator.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    fn translate(&self, text: &str) -> Result<String, ProviderError>;
}
