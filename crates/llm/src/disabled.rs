//! Stand-in provider for deployments with no `[llm]` endpoint configured.

use cf_domain::error::{Error, Result};

use crate::traits::{ChatRequest, ChatResponse, LlmProvider};

/// Fails every call with a clear message. Directory and session features
/// keep working; only the model-backed actions report the missing endpoint.
pub struct DisabledProvider;

#[async_trait::async_trait]
impl LlmProvider for DisabledProvider {
    async fn chat(&self, _req: ChatRequest) -> Result<ChatResponse> {
        Err(Error::Provider {
            provider: self.provider_id().into(),
            message: "no language model endpoint configured (llm.base_url is empty)".into(),
        })
    }

    fn provider_id(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_fails() {
        let provider = DisabledProvider;
        let err = provider.chat(ChatRequest::default()).await;
        assert!(err.is_err());
    }
}
