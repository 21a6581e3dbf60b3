use serde::Serialize;
use thiserror::Error;

use super::stage_outcome::{Stage, StageError};

/// Input errors that stop analysis before any stage runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Sentence cannot be empty")]
    EmptySentence,
    #[error("Analyzer not initialized")]
    NotReady,
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Everything a flashcard needs from one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentenceAnalysis {
    /// The input sentence, unmodified.
    pub sentence: String,
    pub highlighted_sentence: String,
    pub highlighted_annotated_sentence: String,
    pub translation: String,
    /// Dictionary form of the focus word, or the focus word itself.
    pub target_word: String,
    pub target_word_reading: String,
    pub target_word_annotation: String,
    pub definition: String,
    pub pitch_accent_markup: String,
    /// Stages that fell back to a default, in execution order.
    pub degraded_stages: Vec<StageError>,
}

impl SentenceAnalysis {
    pub fn is_degraded(&self, stage: Stage) -> bool {
        self.degraded_stages.iter().any(|e| e.stage == stage)
    }
}
