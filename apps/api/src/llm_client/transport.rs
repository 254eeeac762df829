//! Wire layer for the chat-completions endpoint: request/response envelopes, the transport
//! seam, and the mapping from HTTP outcomes onto `LlmError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::LlmError;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sends one chat request and returns the reply text.
/// Implementations map every failure onto an `LlmError` variant.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<String, LlmError>;
}

/// reqwest-backed transport with bounded connect and request timeouts.
pub struct HttpTransport {
    client: Client,
    api_url: String,
}

impl HttpTransport {
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_url })
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("LLM API returned {}: {}", status, truncate(&body, 200));
            return Err(classify_status(status, &body));
        }

        reply_content(&body)
    }
}

/// Maps a non-2xx status onto the error taxonomy.
pub fn classify_status(status: StatusCode, body: &str) -> LlmError {
    match status.as_u16() {
        401 => LlmError::Auth,
        429 => LlmError::RateLimited,
        code if code >= 500 => LlmError::ServiceUnavailable { status: code },
        code => {
            let message = serde_json::from_str::<ApiErrorEnvelope>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            LlmError::Protocol(format!("request failed with status {code}: {message}"))
        }
    }
}

/// Pulls `choices[0].message.content` out of a 2xx body.
pub fn reply_content(body: &str) -> Result<String, LlmError> {
    let envelope: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Protocol(format!("malformed response envelope: {e}")))?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::Protocol("response has no choices[0].message.content".to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
