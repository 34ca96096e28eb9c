use crate::config::Config;
use crate::error::GenerationError;
use crate::i18n::{strings, Language};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Produces the assistant's reply to a user utterance.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate a reply to `prompt_text` in `language`, in character as
    /// described by `persona`.
    async fn generate(
        &self,
        prompt_text: &str,
        language: Language,
        persona: &str,
    ) -> Result<String, GenerationError>;

    /// Whether the generator can serve requests at all.
    fn is_ready(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// OpenAI-compatible chat completions client (OpenRouter by default).
#[derive(Debug, Clone)]
pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsGenerator {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.llm_api_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ResponseGenerator for ChatCompletionsGenerator {
    async fn generate(
        &self,
        prompt_text: &str,
        language: Language,
        persona: &str,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::NotConfigured)?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: persona.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: build_prompt(prompt_text, language),
                },
            ],
            max_tokens: 500,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Engine(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Engine(format!("HTTP {}: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Engine(format!("invalid response body: {}", e)))?;

        let raw = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let cleaned = clean_response(&raw);
        if cleaned.is_empty() {
            return Err(GenerationError::Empty);
        }

        info!("Generated response ({}): '{}'", language, preview(&cleaned));
        Ok(cleaned)
    }

    fn is_ready(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Build the user message for `language`.
///
/// Languages without a native template use the English one, followed by an
/// explicit instruction naming the language to reply in.
pub fn build_prompt(user_input: &str, language: Language) -> String {
    let profile_strings = language.profile().strings;
    let prompt = profile_strings.render_prompt(user_input);

    let uses_english_template =
        profile_strings.prompt_template == strings::ENGLISH_STRINGS.prompt_template;

    if uses_english_template && language != Language::English {
        format!(
            "Reply only in {} ({}), written in its native script.\n\n{}",
            language.name(),
            language.native_name(),
            prompt
        )
    } else {
        prompt
    }
}

static LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Tidy a raw reply: drop an echoed speaker label, collapse whitespace and
/// make sure the text ends like a sentence.
pub fn clean_response(text: &str) -> String {
    let label_regex = LABEL_REGEX.get_or_init(|| {
        let labels: Vec<String> = ["Response:", "Answer:", "Text:"]
            .into_iter()
            .chain(strings::ALL_STRINGS.iter().map(|s| s.reply_label))
            .map(regex::escape)
            .collect();
        Regex::new(&format!(r"^(?:{})\s*", labels.join("|"))).expect("label regex is valid")
    });
    let whitespace_regex =
        WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

    let text = text.trim();
    let text = label_regex.replace(text, "");
    let text = whitespace_regex.replace_all(&text, " ");
    let mut text = text.trim().to_string();

    if !text.is_empty() && !text.ends_with(['.', '!', '?', '।', '॥']) {
        text.push('.');
    }

    debug!("Cleaned response to {} chars", text.chars().count());
    text
}

/// First 50 characters, for logs.
pub(crate) fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(50).collect();
    if text.chars().count() > 50 {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::PERSONA_CONTEXT;
    use wiremock::{
        matchers::{body_string_contains, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helper Functions ====================

    fn generator(server: &MockServer, api_key: Option<&str>) -> ChatCompletionsGenerator {
        ChatCompletionsGenerator::new(
            reqwest::Client::new(),
            format!("{}/api/v1", server.uri()),
            api_key.map(str::to_string),
            "google/gemini-2.0-flash-exp:free",
        )
    }

    fn create_chat_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "gen-123",
            "object": "chat.completion",
            "model": "google/gemini-2.0-flash-exp:free",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }
            ]
        })
    }

    // ==================== generate Tests ====================

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_string_contains("Lord Ganesha"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_chat_response("Ganesha: Om Gam Ganapataye Namaha! Begin with faith")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = generator(&server, Some("test-key"))
            .generate("How do I start my new shop?", Language::English, PERSONA_CONTEXT)
            .await
            .unwrap();

        assert_eq!(reply, "Om Gam Ganapataye Namaha! Begin with faith.");
    }

    #[tokio::test]
    async fn test_generate_sends_native_prompt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(body_string_contains("भक्त: नमस्ते"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_chat_response("ॐ गं गणपतये नमः!")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = generator(&server, Some("test-key"))
            .generate("नमस्ते", Language::Hindi, PERSONA_CONTEXT)
            .await
            .unwrap();

        assert_eq!(reply, "ॐ गं गणपतये नमः!");
    }

    #[tokio::test]
    async fn test_generate_without_key_is_not_configured() {
        let server = MockServer::start().await;
        let generator = generator(&server, None);

        assert!(!generator.is_ready());
        let result = generator.generate("hello", Language::English, PERSONA_CONTEXT).await;
        assert!(matches!(result, Err(GenerationError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_generate_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let result = generator(&server, Some("test-key"))
            .generate("hello", Language::English, PERSONA_CONTEXT)
            .await;

        match result {
            Err(GenerationError::Engine(msg)) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate limited"));
            }
            other => panic!("expected engine error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_empty_choices_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&server)
            .await;

        let result = generator(&server, Some("test-key"))
            .generate("hello", Language::English, PERSONA_CONTEXT)
            .await;
        assert!(matches!(result, Err(GenerationError::Empty)));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = generator(&server, Some("test-key"))
            .generate("hello", Language::English, PERSONA_CONTEXT)
            .await;
        assert!(matches!(result, Err(GenerationError::Engine(_))));
    }

    // ==================== Prompt Tests ====================

    #[test]
    fn test_build_prompt_native_template() {
        let prompt = build_prompt("வணக்கம்", Language::Tamil);
        assert!(prompt.contains("பக்தர்: வணக்கம்"));
        assert!(!prompt.starts_with("Reply only in"));
    }

    #[test]
    fn test_build_prompt_names_language_without_template() {
        let prompt = build_prompt("ਸਤ ਸ੍ਰੀ ਅਕਾਲ", Language::Punjabi);
        assert!(prompt.starts_with("Reply only in Punjabi (ਪੰਜਾਬੀ)"));
        assert!(prompt.contains("User: ਸਤ ਸ੍ਰੀ ਅਕਾਲ"));
    }

    #[test]
    fn test_build_prompt_english() {
        let prompt = build_prompt("Hello", Language::English);
        assert!(prompt.contains("User: Hello"));
        assert!(!prompt.starts_with("Reply only in"));
    }

    // ==================== clean_response Tests ====================

    #[test]
    fn test_clean_strips_labels() {
        assert_eq!(clean_response("Answer: Be patient"), "Be patient.");
        assert_eq!(clean_response("गणेश जी: धैर्य रखें।"), "धैर्य रखें।");
        assert_eq!(clean_response("விநாயகர்: நல்லது"), "நல்லது.");
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_response("  Bless   you\n\nchild!  "), "Bless you child!");
    }

    #[test]
    fn test_clean_keeps_existing_terminator() {
        assert_eq!(clean_response("Really?"), "Really?");
        assert_eq!(clean_response("ॐ गं गणपतये नमः॥"), "ॐ गं गणपतये नमः॥");
    }

    #[test]
    fn test_clean_empty_stays_empty() {
        assert_eq!(clean_response(""), "");
        assert_eq!(clean_response("   \n "), "");
        assert_eq!(clean_response("Ganesha:"), "");
    }

    #[test]
    fn test_preview_truncates() {
        let long = "ॐ".repeat(80);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 53);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            model: "google/gemini-2.0-flash-exp:free".to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            max_tokens: 500,
            temperature: 0.7,
        };

        let json = serde_json::to_string(&request).expect("Should serialize");
        assert!(json.contains("gemini"));
        assert!(json.contains("\"max_tokens\":500"));
    }
}
