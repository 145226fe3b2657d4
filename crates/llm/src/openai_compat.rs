//! OpenAI-compatible adapter.
//!
//! Works with OpenAI, Azure-style gateways, Ollama, vLLM, and any other
//! endpoint that follows the chat completions contract.

use serde_json::Value;

use cf_domain::config::LlmConfig;
use cf_domain::error::{Error, Result};

use crate::traits::{ChatRequest, ChatResponse, LlmProvider};

/// An LLM adapter for any OpenAI-compatible API endpoint.
pub struct OpenAiCompatProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    default_temperature: f32,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider from the deserialized config.
    ///
    /// The API key is read from the env var named by `api_key_env` once
    /// at construction; a missing key is allowed (local endpoints such
    /// as Ollama take no auth).
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        if cfg.base_url.is_empty() {
            return Err(Error::Config(
                "llm.base_url is empty; no provider endpoint configured".into(),
            ));
        }

        let api_key = std::env::var(&cfg.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!(
                env = %cfg.api_key_env,
                "no LLM API key in environment; sending unauthenticated requests"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key,
            default_temperature: cfg.temperature,
            client,
        })
    }

    fn build_body(&self, req: &ChatRequest) -> Value {
        let mut messages: Vec<Value> = Vec::new();
        if let Some(system) = &req.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": req.user}));

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": req.temperature.unwrap_or(self.default_temperature),
        });
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if req.json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }
        body
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let resp = builder
            .json(&self.build_body(&req))
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let body: Value = resp.json().await.map_err(from_reqwest)?;
        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unknown provider error")
                .to_string();
            return Err(Error::Provider {
                provider: self.provider_id().into(),
                message: format!("HTTP {status}: {message}"),
            });
        }

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| Error::Provider {
                provider: self.provider_id().into(),
                message: "response missing choices[0].message.content".into(),
            })?
            .to_string();
        let model = body["model"].as_str().unwrap_or(&self.model).to_string();

        Ok(ChatResponse { content, model })
    }

    fn provider_id(&self) -> &str {
        "openai_compat"
    }
}

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
