use std::sync::Arc;

use cf_directory::Directory;
use cf_domain::config::Config;
use cf_engine::StepExecutor;
use cf_sessions::{SessionLocks, SessionStore};

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<Directory>,
    pub sessions: Arc<SessionStore>,
    pub session_locks: Arc<SessionLocks>,
    pub executor: Arc<StepExecutor>,

    /// SHA-256 hash of the API bearer token (read once at startup).
    /// `None` = dev mode (no auth enforced).
    pub api_token_hash: Option<Vec<u8>>,
}
