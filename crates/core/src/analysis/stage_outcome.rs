use std::fmt;

use serde::Serialize;

use crate::shared::provider_error::ProviderError;

/// The analysis stages that may degrade independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TargetSelection,
    Annotation,
    DictionaryForm,
    Reading,
    WordAnnotation,
    Definition,
    Translation,
    PitchAccent,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::TargetSelection => "target word selection",
            Stage::Annotation => "sentence annotation",
            Stage::DictionaryForm => "dictionary form",
            Stage::Reading => "reading",
            Stage::WordAnnotation => "target word annotation",
            Stage::Definition => "definition lookup",
            Stage::Translation => "translation",
            Stage::PitchAccent => "pitch accent lookup",
        };
        f.write_str(name)
    }
}

/// A stage that fell back to its default value, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

/// Result of one stage: always a usable value, plus the error if it degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome<T> {
    pub stage: Stage,
    pub value: T,
    pub error: Option<String>,
}

impl<T> StageOutcome<T> {
    pub fn ok(stage: Stage, value: T) -> Self {
        Self {
            stage,
            value,
            error: None,
        }
    }

    /// Keeps the value on success; on failure logs and uses `fallback`.
    pub fn from_result(
        stage: Stage,
        result: Result<T, ProviderError>,
        fallback: impl FnOnce() -> T,
    ) -> Self {
        match result {
            Ok(value) => Self::ok(stage, value),
            Err(e) => {
                log::warn!("Analysis stage '{stage}' degraded: {e}");
                Self {
                    stage,
                    value: fallback(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Unwraps the value, recording the error (if any) in `errors`.
    pub fn merge_into(self, errors: &mut Vec<StageError>) -> T {
        if let Some(message) = self.error {
            errors.push(StageError {
                stage: self.stage,
                message,
            });
        }
        self.value
    }
}
