//! Exchange orchestration.
//!
//! One exchange moves strictly forward through
//! `Received -> Transcribed -> Responded -> Synthesized | Degraded`, or stops
//! with an `ExchangeError`. Only transcription can stop it. Generation
//! failures are replaced by the resolved language's fallback message, and
//! synthesis failures leave the exchange text-only.

use crate::config::Config;
use crate::detect::{LanguageResolver, Resolution, ResolutionSource, Utterance, WhatlangDetector};
use crate::error::{ExchangeError, GenerationError};
use crate::generation::{preview, ChatCompletionsGenerator, ResponseGenerator};
use crate::i18n::{Language, PERSONA_CONTEXT};
use crate::synthesis::{SpeechApiSynthesizer, Synthesizer};
use crate::transcription::{AudioInput, Transcriber, WhisperApiTranscriber};
use crate::worker_pool::WorkerPool;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Path prefix under which synthesized audio is served.
pub const OUTPUTS_ROUTE: &str = "/outputs";

#[derive(Debug, Clone)]
pub enum ExchangeInput {
    Audio(AudioInput),
    Text(String),
}

impl ExchangeInput {
    fn kind(&self) -> &'static str {
        match self {
            ExchangeInput::Audio(_) => "audio",
            ExchangeInput::Text(_) => "text",
        }
    }
}

/// What a caller submits for one exchange.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub input: ExchangeInput,
    /// Caller's language override. Treated as a hint: a contradicting
    /// native script still wins.
    pub language: Option<String>,
}

impl ExchangeRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            input: ExchangeInput::Text(text.into()),
            language: None,
        }
    }

    pub fn audio(audio: AudioInput) -> Self {
        Self {
            input: ExchangeInput::Audio(audio),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStage {
    Received,
    Transcribed,
    Responded,
    Synthesized,
    Degraded,
}

/// Result of a completed exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeReport {
    pub session_id: String,
    /// Recognised speech; absent for text input.
    pub transcript: Option<String>,
    pub resolved_input_language: Language,
    pub input_resolution: ResolutionSource,
    pub response_text: String,
    pub resolved_response_language: Language,
    pub voice: &'static str,
    /// `/outputs/<file>` when synthesis produced a valid artifact.
    pub audio_reference: Option<String>,
    pub stage: ExchangeStage,
    /// The response is the canned fallback, not a generated reply.
    pub generation_fallback: bool,
    pub completed_at: DateTime<Utc>,
}

pub struct Pipeline {
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn ResponseGenerator>,
    synthesizer: Arc<dyn Synthesizer>,
    resolver: LanguageResolver,
    pool: WorkerPool,
    output_dir: PathBuf,
    generation_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn ResponseGenerator>,
        synthesizer: Arc<dyn Synthesizer>,
        resolver: LanguageResolver,
        pool: WorkerPool,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transcriber,
            generator,
            synthesizer,
            resolver,
            pool,
            output_dir: output_dir.into(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Production wiring: HTTP engines sharing one client, whatlang for
    /// statistical detection.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(
            Arc::new(WhisperApiTranscriber::from_config(client.clone(), config)),
            Arc::new(ChatCompletionsGenerator::from_config(client.clone(), config)),
            Arc::new(SpeechApiSynthesizer::from_config(client, config)),
            LanguageResolver::new(Arc::new(WhatlangDetector::new())),
            WorkerPool::new(config.worker_pool_size),
            config.output_dir.clone(),
        )
        .with_generation_timeout(config.llm_timeout()))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn resolver(&self) -> &LanguageResolver {
        &self.resolver
    }

    /// Readiness of (transcription, generation, synthesis).
    pub fn engine_status(&self) -> (bool, bool, bool) {
        (
            self.transcriber.is_ready(),
            self.generator.is_ready(),
            self.synthesizer.is_ready(),
        )
    }

    /// Run one exchange to completion.
    pub async fn run(&self, request: ExchangeRequest) -> Result<ExchangeReport, ExchangeError> {
        let session_id = Uuid::new_v4().to_string();
        info!("[{}] {:?}: {} input", session_id, ExchangeStage::Received, request.input.kind());

        // Received -> Transcribed
        let (text, transcript, engine_hint) = match request.input {
            ExchangeInput::Audio(audio) => {
                let transcribed = self
                    .pool
                    .run("transcription", self.transcriber.transcribe(&audio))
                    .await?
                    .map_err(|e| {
                        error!("[{}] Transcription failed: {}", session_id, e);
                        ExchangeError::from(e)
                    })?;
                (
                    transcribed.text.clone(),
                    Some(transcribed.text),
                    transcribed.reported_language,
                )
            }
            ExchangeInput::Text(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(ExchangeError::EmptyInput);
                }
                (text, None, None)
            }
        };
        info!("[{}] {:?}: '{}'", session_id, ExchangeStage::Transcribed, preview(&text));

        // Transcribed -> Responded
        let hint = request
            .language
            .filter(|l| Language::from_code(l).is_ok())
            .or(engine_hint);
        let input = self
            .resolver
            .resolve(&Utterance::new(text.as_str()).with_optional_hint(hint));

        let (response_text, generation_fallback) = match self.generate(&text, input.language).await {
            Ok(reply) => (reply, false),
            Err(e) => {
                warn!("[{}] Generation failed, using fallback message: {}", session_id, e);
                (input.language.profile().strings.fallback_message.to_string(), true)
            }
        };
        info!(
            "[{}] {:?}: input {} via {:?}, fallback: {}",
            session_id,
            ExchangeStage::Responded,
            input.language,
            input.source,
            generation_fallback
        );

        // Responded -> Synthesized | Degraded
        let response = self.resolver.resolve_text(&response_text);
        let voice = response.language.voice();
        let audio_reference = self.synthesize(&session_id, &response_text, response, voice).await;

        let stage = if audio_reference.is_some() {
            ExchangeStage::Synthesized
        } else {
            ExchangeStage::Degraded
        };
        info!("[{}] {:?}", session_id, stage);

        Ok(ExchangeReport {
            session_id,
            transcript,
            resolved_input_language: input.language,
            input_resolution: input.source,
            response_text,
            resolved_response_language: response.language,
            voice,
            audio_reference,
            stage,
            generation_fallback,
            completed_at: Utc::now(),
        })
    }

    async fn generate(&self, text: &str, language: Language) -> Result<String, GenerationError> {
        let reply = tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(text, language, PERSONA_CONTEXT),
        )
        .await
        .map_err(|_| GenerationError::Timeout(self.generation_timeout))??;

        if reply.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(reply)
    }

    /// Returns the served path of the artifact, or `None` when the exchange
    /// has to degrade to text.
    async fn synthesize(
        &self,
        session_id: &str,
        text: &str,
        response: Resolution,
        voice: &str,
    ) -> Option<String> {
        let file_name = format!("{}_response.wav", session_id);
        let output = self.output_dir.join(&file_name);

        match self
            .pool
            .run("synthesis", self.synthesizer.synthesize(text, voice, &output))
            .await
        {
            Ok(Ok(artifact)) => {
                info!(
                    "[{}] Synthesized {} bytes in {} (voice {})",
                    session_id, artifact.size_bytes, response.language, voice
                );
                Some(format!("{}/{}", OUTPUTS_ROUTE, file_name))
            }
            Ok(Err(e)) => {
                warn!("[{}] Synthesis failed, returning text only: {}", session_id, e);
                None
            }
            Err(e) => {
                warn!("[{}] Synthesis not scheduled, returning text only: {}", session_id, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("resolver", &self.resolver)
            .field("pool", &self.pool)
            .field("output_dir", &self.output_dir)
            .field("generation_timeout", &self.generation_timeout)
            .finish_non_exhaustive()
    }
}
