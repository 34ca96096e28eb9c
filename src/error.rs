//! Error types for the collaborators and for a whole exchange.
//!
//! Only `ExchangeError` ever reaches a caller. The stage errors are absorbed
//! by the pipeline (generation falls back, synthesis degrades) except for
//! transcription, which is fatal for audio input.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("No speech detected in audio")]
    NoSpeech,

    #[error("Transcription engine is not configured: {0}")]
    NotConfigured(String),

    #[error("Transcription engine error: {0}")]
    Engine(String),
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Response generator is not configured")]
    NotConfigured,

    #[error("Response generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Response generator returned an empty reply")]
    Empty,

    #[error("Response generator error: {0}")]
    Engine(String),
}

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Nothing left to speak after cleaning the text")]
    EmptyText,

    #[error("Synthesis engine is not configured")]
    NotConfigured,

    #[error("Synthesis engine error: {0}")]
    Engine(String),

    #[error("Synthesized artifact {path:?} is invalid ({size} bytes)")]
    InvalidArtifact { path: PathBuf, size: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that reject an exchange outright.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Please provide some text")]
    EmptyInput,

    #[error("Could not understand the audio. Please speak clearly.")]
    NoSpeech,

    #[error("Speech recognition error: {0}")]
    Transcription(String),

    #[error("Worker pool is shut down")]
    PoolClosed,
}

impl From<TranscriptionError> for ExchangeError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::NoSpeech => ExchangeError::NoSpeech,
            other => ExchangeError::Transcription(other.to_string()),
        }
    }
}

impl ExchangeError {
    /// Whether the caller sent something unusable (as opposed to an engine
    /// failing on a valid request).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExchangeError::EmptyInput | ExchangeError::NoSpeech)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_speech_maps_to_client_error() {
        let err: ExchangeError = TranscriptionError::NoSpeech.into();
        assert!(matches!(err, ExchangeError::NoSpeech));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_engine_failure_maps_to_server_error() {
        let err: ExchangeError = TranscriptionError::Engine("HTTP 503".to_string()).into();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_timeout_message() {
        let err = GenerationError::Timeout(Duration::from_secs(20));
        assert!(err.to_string().contains("20s"));
    }
}
