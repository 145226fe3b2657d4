//! Build shared application state from configuration.

use std::sync::Arc;

use anyhow::Context;
use sha2::{Digest, Sha256};

use cf_directory::Directory;
use cf_domain::config::Config;
use cf_engine::handlers::default_registry;
use cf_engine::{CampusGraph, Services, StepExecutor};
use cf_llm::{DisabledProvider, LlmProvider, OpenAiCompatProvider};
use cf_sessions::{SessionLocks, SessionStore};

use crate::state::AppState;

/// Wire every service from the config: stores, provider, registry,
/// graph, executor. Fails fast so a misconfiguration never reaches the
/// first request.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let directory = Arc::new(
        Directory::open(&config.state.path).context("opening the directory store")?,
    );
    let sessions = Arc::new(
        SessionStore::open(&config.state.path).context("opening the session store")?,
    );

    let provider: Arc<dyn LlmProvider> = if config.llm.base_url.is_empty() {
        tracing::warn!("llm.base_url is empty; model-backed actions will fail until configured");
        Arc::new(DisabledProvider)
    } else {
        Arc::new(OpenAiCompatProvider::from_config(&config.llm)?)
    };

    let services = Arc::new(Services::new(directory.clone(), provider));
    let graph = CampusGraph::new(services, default_registry()?);
    let executor = Arc::new(StepExecutor::new(Arc::new(graph), config.engine.max_steps));

    let api_token_hash = read_api_token_hash(&config.server.api_token_env);

    Ok(AppState {
        config,
        directory,
        sessions,
        session_locks: Arc::new(SessionLocks::new()),
        executor,
        api_token_hash,
    })
}

/// Read the bearer token env var once at startup and keep only its
/// SHA-256 digest.
pub fn read_api_token_hash(env_name: &str) -> Option<Vec<u8>> {
    match std::env::var(env_name) {
        Ok(token) if !token.is_empty() => Some(Sha256::digest(token.as_bytes()).to_vec()),
        _ => {
            tracing::warn!(
                env = %env_name,
                "API token not set; requests are not authenticated (dev mode)"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_builds_from_defaults_in_a_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.state.path = dir.path().to_path_buf();

        let state = build_app_state(Arc::new(config)).unwrap();
        assert_eq!(state.session_locks.session_count(), 0);
        assert_eq!(state.config.engine.max_steps, 100);
    }
}
