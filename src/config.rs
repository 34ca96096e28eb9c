use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Local frontend dev servers.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:3001",
];

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub cors_origins: Vec<String>,

    // Storage for synthesized audio
    pub output_dir: PathBuf,

    // Response generation (OpenRouter / OpenAI-compatible chat completions)
    pub llm_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,

    // Transcription (OpenAI-compatible audio transcriptions)
    pub stt_api_key: Option<String>,
    pub stt_api_url: String,
    pub stt_model: String,

    // Synthesis (OpenAI-compatible audio speech). Voices are Edge neural voice
    // ids such as "hi-IN-MadhurNeural", so the server must accept them
    // (openai-edge-tts does); OpenAI's own endpoint rejects them.
    pub tts_api_key: Option<String>,
    pub tts_api_url: String,
    pub tts_model: String,

    // Concurrent transcription/synthesis jobs
    pub worker_pool_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8000)?,
            max_file_size: parse_var("MAX_FILE_SIZE", 50_000_000)?,
            cors_origins: list_var("CORS_ORIGINS", DEFAULT_CORS_ORIGINS),

            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "outputs".to_string())
                .into(),

            llm_api_key: non_empty_var("OPENROUTER_API_KEY"),
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            llm_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| "google/gemini-2.0-flash-exp:free".to_string()),
            llm_timeout_secs: parse_var("LLM_TIMEOUT_SECS", 20)?,

            stt_api_key: non_empty_var("STT_API_KEY"),
            stt_api_url: std::env::var("STT_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            stt_model: std::env::var("STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string()),

            tts_api_key: non_empty_var("TTS_API_KEY"),
            tts_api_url: std::env::var("TTS_API_URL")
                .unwrap_or_else(|_| "http://localhost:5050/v1".to_string()),
            tts_model: std::env::var("TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),

            worker_pool_size: parse_var("WORKER_POOL_SIZE", 4)?,
        };

        anyhow::ensure!(config.worker_pool_size > 0, "WORKER_POOL_SIZE must be at least 1");
        anyhow::ensure!(config.llm_timeout_secs > 0, "LLM_TIMEOUT_SECS must be at least 1");

        Ok(config)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an optional variable, failing loudly on a malformed value rather
/// than silently using the default.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Comma-separated list; unset or blank means `default`.
fn list_var(name: &str, default: &[&str]) -> Vec<String> {
    let items: Vec<String> = non_empty_var(name)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        default.iter().map(|item| item.to_string()).collect()
    } else {
        items
    }
}
