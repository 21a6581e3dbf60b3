use crate::shared::provider_error::ProviderError;

/// Produces annotated text: kanji runs followed by their reading in
/// brackets, e.g. `本[ほん] を 読[よ]む`.
pub trait AnnotationGenerator: Send + Sync {
    fn generate(&self, sentence: &str) -> Result<String, ProviderError>;

    fn generate_for_word(&self, word: &str) -> Result<String, ProviderError>;
}
