use std::env;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::app_config::AppConfig;
use crate::errors::LlmError;
use crate::event_stream::SseDecoder;

// LLM Provider enum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LLMProvider {
    Anthropic,
    OpenRouter,
    Gemini,
}

impl Default for LLMProvider {
    fn default() -> Self {
        LLMProvider::Anthropic
    }
}

impl LLMProvider {
    /// Environment variable holding the provider's API key
    pub fn credential_name(&self) -> &'static str {
        match self {
            LLMProvider::Anthropic => "ANTHROPIC_API_KEY",
            LLMProvider::OpenRouter => "OPENROUTER_API_KEY",
            LLMProvider::Gemini => "GEMINI_API_KEY",
        }
    }
}

// Anthropic API configuration
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

// OpenRouter API configuration
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-sonnet-4";

// Gemini API configuration
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// A text-completion backend. Handlers only see this trait so tests can
/// substitute a scripted client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Whether the credential for the active provider is present
    fn is_configured(&self) -> bool;

    fn credential_name(&self) -> &'static str;

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;

    /// Stream the reply as text deltas. The default yields the whole reply
    /// as one chunk.
    async fn complete_stream(&self, prompt: &str, max_tokens: u32) -> Result<TextStream, LlmError> {
        let text = self.complete(prompt, max_tokens).await?;
        Ok(stream::once(async move { Ok(text) }).boxed())
    }
}

// Struct to hold the Anthropic LLM response
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

// Struct to hold the OpenRouter LLM response
#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<OpenRouterChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
}

#[derive(Debug, Deserialize)]
struct OpenRouterMessage {
    #[serde(default)]
    content: Option<String>,
}

// Struct to hold the Gemini LLM response
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

fn anthropic_payload(model: &str, prompt: &str, max_tokens: u32, stream: bool) -> Value {
    let mut payload = json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ]
    });
    if stream {
        payload["stream"] = Value::Bool(true);
    }
    payload
}

fn openrouter_payload(model: &str, prompt: &str, max_tokens: u32) -> Value {
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ]
    })
}

fn gemini_payload(prompt: &str, max_tokens: u32) -> Value {
    json!({
        "contents": [
            {
                "parts": [
                    {
                        "text": prompt
                    }
                ]
            }
        ],
        "generationConfig": {
            "maxOutputTokens": max_tokens
        }
    })
}

fn first_text<I: IntoIterator<Item = String>>(texts: I) -> Result<String, LlmError> {
    texts
        .into_iter()
        .find(|text| !text.is_empty())
        .ok_or(LlmError::EmptyResponse)
}

fn anthropic_text(body: AnthropicResponse) -> Result<String, LlmError> {
    first_text(
        body.content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .map(|block| block.text),
    )
}

fn openrouter_text(body: OpenRouterResponse) -> Result<String, LlmError> {
    first_text(body.choices.into_iter().filter_map(|choice| choice.message.content))
}

fn gemini_text(body: GeminiResponse) -> Result<String, LlmError> {
    first_text(
        body.candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .map(|part| part.text),
    )
}

/// One decoded Anthropic stream event: `Some(text)` for a text delta,
/// `None` for events that carry no text.
fn anthropic_stream_delta(data: &str) -> Result<Option<String>, LlmError> {
    let event: Value = serde_json::from_str(data).map_err(|e| LlmError::Decode(e.to_string()))?;

    match event["type"].as_str() {
        Some("content_block_delta") if event["delta"]["type"] == "text_delta" => {
            Ok(event["delta"]["text"].as_str().map(str::to_string))
        }
        Some("error") => {
            let message = event["error"]["message"].as_str().unwrap_or("unknown error");
            Err(LlmError::Stream(message.to_string()))
        }
        _ => Ok(None),
    }
}

// Map a non-success provider status onto an error
async fn check_status(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    warn!("LLM provider returned {}: {}", status, message);
    Err(match status.as_u16() {
        401 | 403 => LlmError::Unauthorized,
        429 => LlmError::RateLimited,
        code => LlmError::Api { status: code, message },
    })
}

// LLM Provider implementation
pub struct LLMProviderImpl {
    provider_type: LLMProvider,
    client: Client,
    anthropic_model: String,
    openrouter_model: String,
    gemini_model: String,
}

impl LLMProviderImpl {
    pub fn new(config: &AppConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;

        Ok(Self {
            provider_type: config.provider(),
            client,
            anthropic_model: config
                .anthropic_model
                .clone()
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            openrouter_model: config
                .openrouter_model
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            gemini_model: config
                .gemini_model
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        })
    }

    pub fn provider(&self) -> &LLMProvider {
        &self.provider_type
    }

    // Keys are read on every call so a rotated key takes effect immediately
    fn api_key(&self) -> Result<String, LlmError> {
        let name = self.provider_type.credential_name();
        env::var(name)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingApiKey(name))
    }

    async fn send_anthropic(&self, prompt: &str, max_tokens: u32, stream: bool) -> Result<Response, LlmError> {
        let api_key = self.api_key()?;
        let payload = anthropic_payload(&self.anthropic_model, prompt, max_tokens, stream);

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        check_status(response).await
    }

    async fn complete_anthropic(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let response = self.send_anthropic(prompt, max_tokens, false).await?;
        let body = response.json::<AnthropicResponse>().await?;
        anthropic_text(body)
    }

    async fn complete_openrouter(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let api_key = self.api_key()?;
        let payload = openrouter_payload(&self.openrouter_model, prompt, max_tokens);

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let body = check_status(response).await?.json::<OpenRouterResponse>().await?;
        openrouter_text(body)
    }

    async fn complete_gemini(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let api_key = self.api_key()?;
        let payload = gemini_payload(prompt, max_tokens);
        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, self.gemini_model, api_key);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let body = check_status(response).await?.json::<GeminiResponse>().await?;
        gemini_text(body)
    }

    async fn stream_anthropic(&self, prompt: &str, max_tokens: u32) -> Result<TextStream, LlmError> {
        let response = self.send_anthropic(prompt, max_tokens, true).await?;
        let mut bytes = response.bytes_stream();

        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(async move {
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(Err(LlmError::Stream(e.to_string()))).await;
                        return;
                    }
                };

                for data in decoder.push(&chunk) {
                    let item = match anthropic_stream_delta(&data) {
                        Ok(Some(text)) => Ok(text),
                        Ok(None) => continue,
                        Err(e) => Err(e),
                    };
                    let failed = item.is_err();
                    if tx.send(item).await.is_err() || failed {
                        return;
                    }
                }
            }
            debug!("Anthropic stream finished");
        });

        Ok(ReceiverStream::new(rx).boxed())
    }
}

#[async_trait]
impl LlmClient for LLMProviderImpl {
    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    fn credential_name(&self) -> &'static str {
        self.provider_type.credential_name()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        debug!("Sending prompt to {:?} ({} chars, max {} tokens)", self.provider_type, prompt.len(), max_tokens);
        match self.provider_type {
            LLMProvider::Anthropic => self.complete_anthropic(prompt, max_tokens).await,
            LLMProvider::OpenRouter => self.complete_openrouter(prompt, max_tokens).await,
            LLMProvider::Gemini => self.complete_gemini(prompt, max_tokens).await,
        }
    }

    async fn complete_stream(&self, prompt: &str, max_tokens: u32) -> Result<TextStream, LlmError> {
        match self.provider_type {
            LLMProvider::Anthropic => self.stream_anthropic(prompt, max_tokens).await,
            _ => {
                let text = self.complete(prompt, max_tokens).await?;
                Ok(stream::once(async move { Ok(text) }).boxed())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Client that answers every call with the same scripted reply and
    /// records the prompts it was given.
    pub struct ScriptedLlm {
        configured: bool,
        reply: Result<Vec<String>, LlmError>,
        interruption: Option<LlmError>,
        pub calls: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedLlm {
        pub fn reply(text: &str) -> Self {
            Self::streaming(vec![text.to_string()])
        }

        pub fn streaming(chunks: Vec<String>) -> Self {
            Self { configured: true, reply: Ok(chunks), interruption: None, calls: Mutex::new(Vec::new()) }
        }

        /// Streams `chunks` and then fails with `error`.
        pub fn interrupted(chunks: Vec<String>, error: LlmError) -> Self {
            Self { interruption: Some(error), ..Self::streaming(chunks) }
        }

        pub fn failing(error: LlmError) -> Self {
            Self { configured: true, reply: Err(error), interruption: None, calls: Mutex::new(Vec::new()) }
        }

        pub fn unconfigured() -> Self {
            Self { configured: false, reply: Ok(Vec::new()), interruption: None, calls: Mutex::new(Vec::new()) }
        }

        pub fn last_prompt(&self) -> Option<(String, u32)> {
            self.calls.lock().last().cloned()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        fn is_configured(&self) -> bool {
            self.configured
        }

        fn credential_name(&self) -> &'static str {
            "ANTHROPIC_API_KEY"
        }

        async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
            self.calls.lock().push((prompt.to_string(), max_tokens));
            if let Some(error) = &self.interruption {
                return Err(error.clone());
            }
            self.reply.clone().map(|chunks| chunks.concat())
        }

        async fn complete_stream(&self, prompt: &str, max_tokens: u32) -> Result<TextStream, LlmError> {
            self.calls.lock().push((prompt.to_string(), max_tokens));
            let chunks = self.reply.clone()?;
            let tail = self.interruption.clone().map(Err);
            Ok(stream::iter(chunks.into_iter().map(Ok).chain(tail)).boxed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_provider_is_anthropic() {
        assert_eq!(LLMProvider::default(), LLMProvider::Anthropic);
        assert_eq!(LLMProvider::Gemini.credential_name(), "GEMINI_API_KEY");
    }

    #[test]
    fn test_anthropic_payload() {
        let payload = anthropic_payload(DEFAULT_ANTHROPIC_MODEL, "hello", 2000, false);
        assert_eq!(payload["model"], "claude-sonnet-4-20250514");
        assert_eq!(payload["max_tokens"], 2000);
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "hello");
        assert!(payload.get("stream").is_none());

        let streaming = anthropic_payload(DEFAULT_ANTHROPIC_MODEL, "hello", 2000, true);
        assert_eq!(streaming["stream"], true);
    }

    #[test]
    fn test_gemini_payload_caps_output() {
        let payload = gemini_payload("hi", 1500);
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 1500);
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_response_text_extraction() {
        let anthropic: AnthropicResponse = serde_json::from_value(json!({
            "content": [{"type": "tool_use"}, {"type": "text", "text": "answer"}]
        }))
        .unwrap();
        assert_eq!(anthropic_text(anthropic).unwrap(), "answer");

        let openrouter: OpenRouterResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "routed"}}]
        }))
        .unwrap();
        assert_eq!(openrouter_text(openrouter).unwrap(), "routed");

        let gemini: GeminiResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(matches!(gemini_text(gemini), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_anthropic_stream_delta() {
        let delta = r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hel"}}"#;
        assert_eq!(anthropic_stream_delta(delta).unwrap(), Some("Hel".to_string()));

        let ping = r#"{"type":"ping"}"#;
        assert_eq!(anthropic_stream_delta(ping).unwrap(), None);

        let error = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert!(matches!(anthropic_stream_delta(error), Err(LlmError::Stream(m)) if m == "Overloaded"));
    }

    #[test]
    fn test_models_fall_back_to_defaults() {
        let config = AppConfig {
            gemini_model: Some("gemini-custom".to_string()),
            ..AppConfig::default()
        };
        let provider = LLMProviderImpl::new(&config).unwrap();
        assert_eq!(provider.anthropic_model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(provider.gemini_model, "gemini-custom");
        assert_eq!(provider.provider(), &LLMProvider::Anthropic);
    }

    #[actix_web::test]
    async fn test_default_stream_yields_single_chunk() {
        struct Fixed;

        #[async_trait]
        impl LlmClient for Fixed {
            fn is_configured(&self) -> bool {
                true
            }
            fn credential_name(&self) -> &'static str {
                "TEST_KEY"
            }
            async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
                Ok("whole reply".to_string())
            }
        }

        let chunks: Vec<Result<String, LlmError>> = Fixed.complete_stream("p", 1).await.unwrap().collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), "whole reply");
    }
}
