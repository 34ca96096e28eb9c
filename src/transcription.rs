//! Speech-to-text.
//!
//! `WhisperApiTranscriber` talks to any OpenAI-compatible
//! `/audio/transcriptions` endpoint. The language it reports is only ever
//! used as a hint for resolution.

use crate::config::Config;
use crate::error::TranscriptionError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

/// Uploaded audio, as received from the caller.
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

impl AudioInput {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// MIME type to upload with, guessed from the file name when the caller
    /// did not send one.
    pub fn mime_type(&self) -> &str {
        if let Some(content_type) = self.content_type.as_deref() {
            return content_type;
        }
        let extension = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "mp3" => "audio/mpeg",
            "ogg" | "oga" => "audio/ogg",
            "webm" => "audio/webm",
            "m4a" => "audio/mp4",
            "flac" => "audio/flac",
            _ => "audio/wav",
        }
    }
}

/// Text recognised in an audio clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Language the engine believes it heard. Unreliable.
    pub reported_language: Option<String>,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one clip. Never returns an empty transcript: silence is
    /// reported as `TranscriptionError::NoSpeech`.
    async fn transcribe(&self, audio: &AudioInput) -> Result<Transcript, TranscriptionError>;

    fn is_ready(&self) -> bool {
        true
    }
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// OpenAI-compatible transcription client (Whisper by default).
#[derive(Debug, Clone)]
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl WhisperApiTranscriber {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.stt_api_url.clone(),
            config.stt_api_key.clone(),
            config.stt_model.clone(),
        )
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, audio: &AudioInput) -> Result<Transcript, TranscriptionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            TranscriptionError::NotConfigured("STT_API_KEY is not set".to_string())
        })?;

        if audio.bytes.is_empty() {
            return Err(TranscriptionError::NoSpeech);
        }

        let url = format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'));
        let part = reqwest::multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.filename.clone())
            .mime_str(audio.mime_type())
            .map_err(|e| TranscriptionError::Engine(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        debug!("Uploading {} bytes of audio for transcription", audio.bytes.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Engine(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Engine(format!("HTTP {}: {}", status, body)));
        }

        let body: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Engine(format!("invalid response body: {}", e)))?;

        let text = body.text.trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::NoSpeech);
        }

        let reported_language = body.language.filter(|l| !l.trim().is_empty());
        info!(
            "Transcribed {} chars (engine reported language: {})",
            text.chars().count(),
            reported_language.as_deref().unwrap_or("none")
        );

        Ok(Transcript {
            text,
            reported_language,
        })
    }

    fn is_ready(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_string_contains, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn transcriber(server: &MockServer, api_key: Option<&str>) -> WhisperApiTranscriber {
        WhisperApiTranscriber::new(
            reqwest::Client::new(),
            format!("{}/v1", server.uri()),
            api_key.map(str::to_string),
            "whisper-1",
        )
    }

    fn clip() -> AudioInput {
        AudioInput::new(vec![0u8; 2048], "question.wav")
    }

    #[tokio::test]
    async fn test_transcribe_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("Authorization", "Bearer stt-key"))
            .and(body_string_contains("verbose_json"))
            .and(body_string_contains("whisper-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task": "transcribe",
                "language": "hindi",
                "duration": 2.4,
                "text": "  नमस्ते गणेश जी  "
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transcript = transcriber(&server, Some("stt-key"))
            .transcribe(&clip())
            .await
            .unwrap();

        assert_eq!(transcript.text, "नमस्ते गणेश जी");
        assert_eq!(transcript.reported_language.as_deref(), Some("hindi"));
    }

    #[tokio::test]
    async fn test_blank_text_is_no_speech() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "text": "   ", "language": "english" })),
            )
            .mount(&server)
            .await;

        let result = transcriber(&server, Some("stt-key")).transcribe(&clip()).await;
        assert!(matches!(result, Err(TranscriptionError::NoSpeech)));
    }

    #[tokio::test]
    async fn test_missing_language_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": "hello" })))
            .mount(&server)
            .await;

        let transcript = transcriber(&server, Some("stt-key"))
            .transcribe(&clip())
            .await
            .unwrap();
        assert_eq!(transcript.text, "hello");
        assert!(transcript.reported_language.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_engine_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let result = transcriber(&server, Some("stt-key")).transcribe(&clip()).await;
        match result {
            Err(TranscriptionError::Engine(msg)) => assert!(msg.contains("503")),
            other => panic!("expected engine error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_upload_is_no_speech_without_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = transcriber(&server, Some("stt-key"))
            .transcribe(&AudioInput::new(Vec::new(), "empty.wav"))
            .await;
        assert!(matches!(result, Err(TranscriptionError::NoSpeech)));
    }

    #[tokio::test]
    async fn test_without_key_is_not_configured() {
        let server = MockServer::start().await;
        let transcriber = transcriber(&server, None);

        assert!(!transcriber.is_ready());
        let result = transcriber.transcribe(&clip()).await;
        assert!(matches!(result, Err(TranscriptionError::NotConfigured(_))));
    }

    #[test]
    fn test_mime_type_guess() {
        assert_eq!(AudioInput::new(vec![], "a.mp3").mime_type(), "audio/mpeg");
        assert_eq!(AudioInput::new(vec![], "a.WEBM").mime_type(), "audio/webm");
        assert_eq!(AudioInput::new(vec![], "recording").mime_type(), "audio/wav");
        assert_eq!(
            AudioInput::new(vec![], "a.mp3")
                .with_content_type("audio/ogg")
                .mime_type(),
            "audio/ogg"
        );
    }
}
