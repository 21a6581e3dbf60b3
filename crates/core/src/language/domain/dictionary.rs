use serde::{Deserialize, Serialize};

use crate::shared::provider_error::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub definition: String,
    #[serde(default)]
    pub part_of_speech: String,
}

/// Domain interface for definition lookup.
pub trait Dictionary: Send + Sync {
    /// Looks up by surface form first, then by dictionary form.
    fn lookup(
        &self,
        surface: &str,
        dictionary_form: &str,
    ) -> Result<Option<DictionaryEntry>, ProviderError>;
}
