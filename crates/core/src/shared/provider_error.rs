use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by any capability provider or language collaborator.
///
/// Every capability trait returns this type so that the analysis stages and
/// the task boundary can degrade or report failures uniformly.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} is not available")]
    Unavailable(String),
    #[error("{provider} failed: {message}")]
    Failed { provider: String, message: String },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write input to {program}: {source}")]
    Input {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid data from {origin}: {message}")]
    InvalidData { origin: String, message: String },
}

impl ProviderError {
    pub fn failed(provider: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Failed {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_data(origin: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidData {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
