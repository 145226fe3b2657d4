//! Engine-owned session store.
//!
//! Persists session snapshots in `sessions.json` under the configured
//! state path. Loading an unknown id yields a fresh unauthenticated
//! state — "session not found" is never an error at this layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use cf_domain::error::{Error, Result};

use crate::state::SessionState;

/// Session store backed by a JSON file. Cheap to share behind an `Arc`.
pub struct SessionStore {
    /// `None` for in-memory stores (tests); `flush` is then a no-op.
    path: Option<PathBuf>,
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl SessionStore {
    /// Load or create the store at `state_path/sessions.json`.
    pub fn open(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;
        let path = state_path.join("sessions.json");

        // Session snapshots are recoverable (users log in again), so an
        // unreadable file starts the store empty rather than refusing boot.
        let sessions: HashMap<String, SessionState> = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(Error::Io)?;
            match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(error = %e, "sessions.json unreadable, starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::info!(
            sessions = sessions.len(),
            path = %path.display(),
            "session store loaded"
        );

        Ok(Self {
            path: Some(path),
            sessions: RwLock::new(sessions),
        })
    }

    /// An empty store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Load the current snapshot for a session id, or a fresh
    /// unauthenticated state when the id is unknown.
    pub fn load(&self, session_id: &str) -> SessionState {
        if let Some(state) = self.sessions.read().get(session_id) {
            return state.clone();
        }
        tracing::debug!(session_id, "new session");
        SessionState::new(session_id)
    }

    /// Persist the snapshot for its session id.
    pub fn save(&self, state: SessionState) {
        self.sessions
            .write()
            .insert(state.session_id.clone(), state);
    }

    /// Drop a session snapshot (expiry policy lives outside the core).
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    /// All current snapshots, for the diagnostic listing.
    pub fn list(&self) -> Vec<SessionState> {
        self.sessions.read().values().cloned().collect()
    }

    /// Persist the current map to disk.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let sessions = self.sessions.read();
        let json = serde_json::to_string_pretty(&*sessions)?;
        std::fs::write(path, json).map_err(Error::Io)?;
        Ok(())
    }
}
