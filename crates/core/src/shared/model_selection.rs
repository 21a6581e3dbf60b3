use std::fmt;

/// A remote model id of the form `"Provider/model"`.
///
/// The provider part picks a backend, the model part is handed to that
/// backend as runtime configuration. An id without a slash names only a
/// model and leaves the backend choice to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelSelection {
    provider: Option<String>,
    model: String,
}

impl ModelSelection {
    /// Returns `None` for a blank label.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let selection = match label.split_once('/') {
            Some((provider, model)) => Self {
                provider: Some(provider.trim().to_string()).filter(|p| !p.is_empty()),
                model: model.trim().to_string(),
            },
            None => Self {
                provider: None,
                model: label.to_string(),
            },
        };
        Some(selection)
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Case-insensitive match against a backend id or display name.
    pub fn targets(&self, backend: &str) -> bool {
        self.provider
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(backend))
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "{provider}/{}", self.model),
            None => f.write_str(&self.model),
        }
    }
}
