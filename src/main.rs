use anyhow::{Context, Result};
use ganesha_voice::config::Config;
use ganesha_voice::pipeline::Pipeline;
use ganesha_voice::server::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ganesha_voice=info".parse()?),
        )
        .init();

    info!("Starting Ganesha voice assistant");

    let config = Config::from_env()?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", config.output_dir))?;

    let pipeline = Pipeline::from_config(&config)?;

    let (transcription, generation, synthesis) = pipeline.engine_status();
    if !generation {
        warn!("OPENROUTER_API_KEY not set; every reply will be the fallback message");
    }
    if !transcription {
        warn!("STT_API_KEY not set; audio chat is unavailable");
    }
    if !synthesis {
        warn!("TTS_API_KEY not set; replies will be text only");
    }

    let app = server::router(AppState::new(Arc::new(pipeline), &config));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Listening on {}", address);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
