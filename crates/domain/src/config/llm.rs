use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuration for the OpenAI-compatible completion endpoint used by
/// quiz generation, grading, and document Q&A.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the endpoint, e.g. `https://api.openai.com/v1`.
    /// Empty disables the provider (actions that need it return errors).
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Request timeout. Handlers block their session for the duration,
    /// so this is the effective upper bound on action latency.
    #[serde(default = "d_60000u")]
    pub timeout_ms: u64,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            model: d_model(),
            api_key_env: d_api_key_env(),
            timeout_ms: 60_000,
            temperature: 0.5,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_model() -> String {
    "gpt-4o-mini".into()
}
fn d_api_key_env() -> String {
    "CAMPUSFLOW_LLM_API_KEY".into()
}
fn d_60000u() -> u64 {
    60_000
}
fn d_temperature() -> f32 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_config_defaults_disable_the_provider() {
        let cfg = LlmConfig::default();
        assert!(cfg.base_url.is_empty());
        assert_eq!(cfg.timeout_ms, 60_000);
    }
}
