//! Text-to-speech.

use crate::config::Config;
use crate::error::SynthesisError;
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Smallest file accepted as real audio. Anything shorter is a header with
/// no samples or an error page saved to disk.
pub const MIN_ARTIFACT_BYTES: u64 = 1000;

/// A playable file produced by synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl AudioArtifact {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Speak `text` with `voice`, writing the audio to `output`.
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output: &Path,
    ) -> Result<AudioArtifact, SynthesisError>;

    fn is_ready(&self) -> bool {
        true
    }
}

/// OpenAI-compatible `/audio/speech` client.
#[derive(Debug, Clone)]
pub struct SpeechApiSynthesizer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl SpeechApiSynthesizer {
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
            config.tts_api_url.clone(),
            config.tts_api_key.clone(),
            config.tts_model.clone(),
        )
    }
}

#[async_trait]
impl Synthesizer for SpeechApiSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        let api_key = self.api_key.as_deref().ok_or(SynthesisError::NotConfigured)?;

        let cleaned = clean_text_for_speech(text);
        if cleaned.is_empty() {
            warn!("Nothing to speak after cleaning: '{}'", text);
            return Err(SynthesisError::EmptyText);
        }

        let url = format!("{}/audio/speech", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "input": cleaned,
            "voice": voice,
            "response_format": "wav",
        });

        debug!("Requesting speech with voice {}", voice);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::Engine(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Engine(format!("HTTP {}: {}", status, body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Engine(format!("failed to read audio: {}", e)))?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, &bytes).await?;

        let artifact = validate_artifact(output).await?;
        info!(
            "Synthesized {} bytes to {} (voice: {})",
            artifact.size_bytes,
            artifact.path.display(),
            voice
        );
        Ok(artifact)
    }

    fn is_ready(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Check that `path` holds a usable audio file. An undersized file is
/// removed so it can never be served.
pub async fn validate_artifact(path: &Path) -> Result<AudioArtifact, SynthesisError> {
    let size = match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => {
            return Err(SynthesisError::InvalidArtifact {
                path: path.to_path_buf(),
                size: 0,
            })
        }
    };

    if size < MIN_ARTIFACT_BYTES {
        if let Err(e) = tokio::fs::remove_file(path).await {
            debug!("Could not remove undersized artifact {}: {}", path.display(), e);
        }
        return Err(SynthesisError::InvalidArtifact {
            path: path.to_path_buf(),
            size,
        });
    }

    Ok(AudioArtifact {
        path: path.to_path_buf(),
        size_bytes: size,
    })
}

struct SpeechPatterns {
    url: Regex,
    email: Regex,
    punctuation: Regex,
    asterisk_word: Regex,
    whitespace: Regex,
}

static SPEECH_PATTERNS: OnceLock<SpeechPatterns> = OnceLock::new();

fn speech_patterns() -> &'static SpeechPatterns {
    SPEECH_PATTERNS.get_or_init(|| SpeechPatterns {
        url: Regex::new(r"https?://\S+").expect("url regex is valid"),
        email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email regex is valid"),
        punctuation: Regex::new(r#"[*'.,!?;:\-()\[\]{}"/\\|<>~`^_+=]"#)
            .expect("punctuation regex is valid"),
        asterisk_word: Regex::new(r"(?i)\basterisk\b").expect("asterisk regex is valid"),
        whitespace: Regex::new(r"\s+").expect("whitespace regex is valid"),
    })
}

/// Strip what a speech engine would read aloud literally: links, e-mail
/// addresses, markdown asterisks and ASCII punctuation.
pub fn clean_text_for_speech(text: &str) -> String {
    let patterns = speech_patterns();

    let text = patterns.url.replace_all(text, "");
    let text = patterns.email.replace_all(&text, "");
    let text = patterns.punctuation.replace_all(&text, "");
    let text = patterns.asterisk_word.replace_all(&text, "");
    let text = patterns.whitespace.replace_all(&text, " ");

    text.trim().to_string()
}
