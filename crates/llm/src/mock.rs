//! Scriptable in-memory provider for tests.

use std::collections::VecDeque;

use parking_lot::Mutex;

use cf_domain::error::{Error, Result};

use crate::traits::{ChatRequest, ChatResponse, LlmProvider};

/// A provider that replays scripted responses in order, then falls back
/// to a fixed default. Also records every request it sees.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<String>>>,
    default_content: String,
    requests: Mutex<Vec<ChatRequest>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_content: "mock response".into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue one successful response.
    pub fn push_response(&self, content: impl Into<String>) {
        self.script.lock().push_back(Ok(content.into()));
    }

    /// Queue one failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.script.lock().push_back(Err(Error::Provider {
            provider: "mock".into(),
            message: message.into(),
        }));
    }

    /// Number of chat calls observed so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Copy of every request seen, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().push(req);
        let scripted = self.script.lock().pop_front();
        let content = match scripted {
            Some(result) => result?,
            None => self.default_content.clone(),
        };
        Ok(ChatResponse {
            content,
            model: "mock".into(),
        })
    }

    fn provider_id(&self) -> &str {
        "mock"
    }
}
