//! Test double for the completion transport: replays scripted replies and records requests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::transport::{ChatRequest, CompletionTransport};
use crate::llm_client::LlmError;

pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<(String, ChatRequest)>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().map(|(_, r)| r.clone())
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.requests.lock().unwrap().last().map(|(k, _)| k.clone())
    }

    /// The user message of every request sent so far.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, r)| r.messages.iter().find(|m| m.role == "user"))
            .map(|m| m.content.clone())
            .collect()
    }
}

#[async_trait]
impl CompletionTransport for ScriptedTransport {
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Network("no scripted reply left".to_string())))
    }
}
