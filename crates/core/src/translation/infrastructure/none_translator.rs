use crate::shared::provider_error::ProviderError;
use crate::translation::domain::translator::Translator;

/// Always available, always returns an empty translation.
pub struct NoneTranslator;

impl Translator for NoneTranslator {
    fn id(&self) -> &str {
        "none"
    }

    fn name(&self) -> &str {
        "None"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn translate(&self, _text: &str) -> Result<String, ProviderError> {
        Ok(String::new())
    }
}
