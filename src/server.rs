//! HTTP surface.
//!
//! - `GET /`: welcome message and endpoint listing
//! - `POST /chat`: multipart `audio` file plus optional `language`
//! - `POST /text-chat`: form `text` plus optional `language`
//! - `GET /languages`: supported languages
//! - `GET /health`: engine readiness
//! - `GET /outputs/*`: synthesized audio

use crate::config::Config;
use crate::error::ExchangeError;
use crate::i18n::LanguageRegistry;
use crate::pipeline::{ExchangeReport, ExchangeRequest, Pipeline, OUTPUTS_ROUTE};
use crate::transcription::AudioInput;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    max_file_size: usize,
    cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, config: &Config) -> Self {
        Self {
            pipeline,
            max_file_size: config.max_file_size,
            cors_origins: config.cors_origins.clone(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let outputs = ServeDir::new(state.pipeline.output_dir());
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/", get(handle_root))
        .route("/chat", post(handle_chat))
        .route("/text-chat", post(handle_text_chat))
        .route("/languages", get(handle_languages))
        .route("/health", get(handle_health))
        .nest_service(OUTPUTS_ROUTE, outputs)
        .layer(DefaultBodyLimit::max(state.max_file_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Browser access for the listed origins. `*` opens the API to any origin,
/// without credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Why a request produced no report.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Multipart(MultipartError),
    Exchange(ExchangeError),
}

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        ApiError::Exchange(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Multipart(err) => (err.status(), err.body_text()),
            ApiError::Exchange(err) if err.is_client_error() => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Exchange(err) => {
                error!("Exchange failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

/// GET /
async fn handle_root() -> Json<serde_json::Value> {
    Json(root_body())
}

pub(crate) fn root_body() -> serde_json::Value {
    let codes: Vec<&str> = LanguageRegistry::get()
        .list_all()
        .into_iter()
        .map(|profile| profile.language.code())
        .collect();

    serde_json::json!({
        "message": "Welcome to the Lord Ganesha voice assistant",
        "description": "Ask questions and receive divine wisdom in multiple languages",
        "supported_languages": codes,
        "endpoints": {
            "chat": "/chat (POST) - Voice chat with audio file",
            "text_chat": "/text-chat (POST) - Text-based chat",
            "languages": "/languages (GET) - Supported languages",
            "health": "/health (GET) - Service health check",
        },
    })
}

/// POST /chat
async fn handle_chat(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExchangeReport>, ApiError> {
    let mut audio = None;
    let mut language = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                let filename = field.file_name().unwrap_or("audio.wav").to_string();
                let content_type = field.content_type().map(str::to_string);
                if !content_type.as_deref().is_some_and(|ct| ct.starts_with("audio/")) {
                    return Err(ApiError::BadRequest("File must be an audio file".to_string()));
                }
                let bytes = field.bytes().await?;
                let mut input = AudioInput::new(bytes.to_vec(), filename);
                if let Some(content_type) = content_type {
                    input = input.with_content_type(content_type);
                }
                audio = Some(input);
            }
            Some("language") => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    language = Some(value.trim().to_string());
                }
            }
            other => warn!("Ignoring unexpected multipart field {:?}", other),
        }
    }

    let audio = audio.ok_or_else(|| ApiError::BadRequest("Missing audio file".to_string()))?;
    let mut request = ExchangeRequest::audio(audio);
    if let Some(language) = language {
        request = request.with_language(language);
    }

    Ok(Json(state.pipeline.run(request).await?))
}

#[derive(Debug, Deserialize)]
struct TextChatForm {
    #[serde(default)]
    text: String,
    language: Option<String>,
}

/// POST /text-chat
async fn handle_text_chat(
    State(state): State<AppState>,
    Form(form): Form<TextChatForm>,
) -> Result<Json<ExchangeReport>, ApiError> {
    let mut request = ExchangeRequest::text(form.text);
    if let Some(language) = form.language.filter(|l| !l.trim().is_empty()) {
        request = request.with_language(language);
    }
    Ok(Json(state.pipeline.run(request).await?))
}

/// GET /languages
async fn handle_languages() -> Json<serde_json::Value> {
    Json(languages_body())
}

pub(crate) fn languages_body() -> serde_json::Value {
    let registry = LanguageRegistry::get();
    let languages: BTreeMap<&str, &str> = registry
        .list_all()
        .into_iter()
        .map(|profile| (profile.language.code(), profile.name))
        .collect();

    serde_json::json!({
        "supported_languages": languages,
        "total_count": languages.len(),
        "default": registry.default_language(),
    })
}

/// GET /health
async fn handle_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (transcription, generation, synthesis) = state.pipeline.engine_status();
    let status = if transcription && generation && synthesis {
        "healthy"
    } else {
        "degraded"
    };

    Json(serde_json::json!({
        "status": status,
        "services": {
            "transcription": transcription,
            "generation": generation,
            "synthesis": synthesis,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_no_speech_is_bad_request() {
        let (status, body) = response_parts(ExchangeError::NoSpeech.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Could not understand the audio. Please speak clearly.");
    }

    #[tokio::test]
    async fn test_empty_input_is_bad_request() {
        let (status, body) = response_parts(ExchangeError::EmptyInput.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Please provide some text");
    }

    #[tokio::test]
    async fn test_engine_failure_is_server_error() {
        let err = ExchangeError::Transcription("HTTP 503".to_string());
        let (status, body) = response_parts(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_bad_request_detail() {
        let (status, body) =
            response_parts(ApiError::BadRequest("File must be an audio file".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "File must be an audio file");
    }

    #[test]
    fn test_root_body_lists_endpoints() {
        let body = root_body();
        assert_eq!(body["supported_languages"].as_array().unwrap().len(), 13);
        assert_eq!(body["endpoints"]["chat"], "/chat (POST) - Voice chat with audio file");
        assert!(body["endpoints"]["languages"].as_str().unwrap().starts_with("/languages"));
    }

    #[test]
    fn test_languages_body_lists_every_language() {
        let body = languages_body();
        assert_eq!(body["total_count"], 13);
        assert_eq!(body["supported_languages"]["ta"], "Tamil");
        assert_eq!(body["supported_languages"]["as"], "Assamese");
        assert_eq!(body["default"], "en");
    }
}
