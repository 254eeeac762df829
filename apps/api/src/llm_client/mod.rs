/// LLM Client: the single point of entry for all language-model calls.
///
/// No other module talks to the chat-completions endpoint directly. Every call goes through
/// `LlmClient::complete`, which applies the response cache and classifies failures.
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::LlmConfig;

pub mod cache;
pub mod extract;
pub mod prompts;
pub mod transport;

#[cfg(test)]
pub mod testing;

use self::cache::{prompt_hash, ResponseCache};
use self::prompts::COUNSELOR_SYSTEM;
use self::transport::{ChatMessage, ChatRequest, CompletionTransport, HttpTransport};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM is not configured: {0}")]
    Configuration(String),

    #[error("LLM API rejected the credential")]
    Auth,

    #[error("LLM API rate limit exceeded")]
    RateLimited,

    #[error("LLM service unavailable (status {status})")]
    ServiceUnavailable { status: u16 },

    #[error("Could not reach the LLM service: {0}")]
    Network(String),

    #[error("Unexpected LLM API response: {0}")]
    Protocol(String),
}

/// Cached, error-classifying client for the chat-completions API.
/// Clones share the transport and the cache.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn CompletionTransport>,
    api_key: Option<String>,
    model: String,
    cache: Arc<ResponseCache>,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let transport = HttpTransport::new(
            config.api_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.api_key.clone(),
            config.model.clone(),
            Duration::from_secs(config.cache_ttl_secs),
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn CompletionTransport>,
        api_key: Option<String>,
        model: String,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            transport,
            api_key,
            model,
            cache: Arc::new(ResponseCache::new(cache_ttl)),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.credential().is_ok()
    }

    /// Returns the model's raw reply text for `prompt`.
    ///
    /// Fails with `Configuration` before any other work when no credential is set.
    /// A fresh cached reply for the identical prompt is returned without a network call.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.credential()?;

        if let Some(text) = self.cache.get(prompt) {
            debug!("LLM cache hit (key {})", prompt_hash(prompt));
            return Ok(text);
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: COUNSELOR_SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let text = self.transport.send(api_key, &request).await?;
        info!(
            "LLM call succeeded: model={}, prompt_chars={}, reply_chars={}",
            self.model,
            prompt.len(),
            text.len()
        );

        self.cache.insert(prompt, &text);
        debug!("LLM cache holds {} entries", self.cache.len());
        Ok(text)
    }

    fn credential(&self) -> Result<&str, LlmError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(LlmError::Configuration(
                "LLM_API_KEY is not set".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;

    fn client(transport: Arc<ScriptedTransport>, key: Option<&str>) -> LlmClient {
        LlmClient::with_transport(
            transport,
            key.map(String::from),
            "test-model".to_string(),
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error_without_network() {
        let transport = ScriptedTransport::replying(&["[]"]);
        for key in [None, Some(""), Some("   ")] {
            let llm = client(transport.clone(), key);
            let err = llm.complete("prompt").await.unwrap_err();
            assert!(matches!(err, LlmError::Configuration(_)));
            assert!(!llm.is_configured());
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_prompt_within_ttl_hits_network_once() {
        let transport = ScriptedTransport::replying(&["first", "second"]);
        let llm = client(transport.clone(), Some("key"));

        assert_eq!(llm.complete("same prompt").await.unwrap(), "first");
        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(llm.complete("same prompt").await.unwrap(), "first");
        assert_eq!(transport.calls(), 1);

        tokio::time::advance(Duration::from_secs(181)).await;
        assert_eq!(llm.complete("same prompt").await.unwrap(), "second");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_distinct_prompts_do_not_share_entries() {
        let transport = ScriptedTransport::replying(&["a", "b"]);
        let llm = client(transport.clone(), Some("key"));
        assert_eq!(llm.complete("prompt one").await.unwrap(), "a");
        assert_eq!(llm.complete("prompt two").await.unwrap(), "b");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_errors_pass_through_and_are_not_cached() {
        let transport = ScriptedTransport::new(vec![
            Err(LlmError::RateLimited),
            Ok("recovered".to_string()),
        ]);
        let llm = client(transport.clone(), Some("key"));

        assert!(matches!(
            llm.complete("p").await.unwrap_err(),
            LlmError::RateLimited
        ));
        assert_eq!(llm.complete("p").await.unwrap(), "recovered");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_request_carries_system_instruction_and_limits() {
        let transport = ScriptedTransport::replying(&["ok"]);
        let llm = client(transport.clone(), Some("secret"));
        llm.complete("what next?").await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.model, "test-model");
        assert_eq!(sent.max_tokens, 1500);
        assert_eq!(sent.messages[0].role, "system");
        assert_eq!(sent.messages[0].content, COUNSELOR_SYSTEM);
        assert_eq!(sent.messages[1].role, "user");
        assert_eq!(sent.messages[1].content, "what next?");
        assert_eq!(transport.last_api_key().as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_clones_share_the_cache_but_instances_do_not() {
        let transport = ScriptedTransport::replying(&["x", "y"]);
        let llm = client(transport.clone(), Some("key"));
        let cloned = llm.clone();
        llm.complete("p").await.unwrap();
        cloned.complete("p").await.unwrap();
        assert_eq!(transport.calls(), 1);

        let separate = client(transport.clone(), Some("key"));
        assert_eq!(separate.complete("p").await.unwrap(), "y");
        assert_eq!(transport.calls(), 2);
    }
}
