use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cf_domain::principal::{AuthzContext, Role};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The persisted snapshot of one login session.
///
/// Mutated exclusively by the step executor: each node takes the state
/// by value and returns a new one, so a failed step can never leave a
/// half-mutated snapshot behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Opaque caller-supplied id, stable across invocations.
    pub session_id: String,
    /// Authenticated principal id; `None` means unauthenticated.
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Populated by the resolver at login, never by client input.
    #[serde(default)]
    pub authz: AuthzContext,
    /// The action requested for this turn; cleared on dispatch.
    #[serde(default)]
    pub pending_action: Option<String>,
    /// Opaque structured data handed to the action handler.
    #[serde(default)]
    pub input_payload: Value,
    /// Human-readable outcome of the most recently executed node.
    #[serde(default)]
    pub last_message: String,
    /// Steps taken since the last halt; reset on halt.
    #[serde(default)]
    pub step_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    /// A fresh unauthenticated session.
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            identity: None,
            role: Role::Unauthenticated,
            authz: AuthzContext::default(),
            pending_action: None,
            input_payload: Value::Null,
            last_message: String::new(),
            step_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.role != Role::Unauthenticated
    }

    // ── Functional updates (one node = one new state) ───────────────

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.last_message = message.into();
        self
    }

    /// Record a successful login.
    pub fn with_login(mut self, identity: String, role: Role, authz: AuthzContext) -> Self {
        self.identity = Some(identity);
        self.role = role;
        self.authz = authz;
        self
    }

    /// Drop identity, role, scope, and any pending action.
    pub fn logged_out(mut self) -> Self {
        self.identity = None;
        self.role = Role::Unauthenticated;
        self.authz = AuthzContext::default();
        self.pending_action = None;
        self.input_payload = Value::Null;
        self
    }

    pub fn without_pending_action(mut self) -> Self {
        self.pending_action = None;
        self
    }

    /// Reset the step counter at a halt point and stamp the update time.
    pub fn halted(mut self) -> Self {
        self.step_count = 0;
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_unauthenticated() {
        let s = SessionState::new("s1");
        assert!(!s.is_authenticated());
        assert!(s.identity.is_none());
        assert!(s.authz.is_empty());
    }

    #[test]
    fn logout_clears_everything_scoped() {
        let s = SessionState::new("s1")
            .with_login(
                "p1".into(),
                Role::Staff,
                AuthzContext {
                    org_id: Some("o1".into()),
                    group_id: Some("g1".into()),
                },
            )
            .logged_out();
        assert!(!s.is_authenticated());
        assert!(s.identity.is_none());
        assert!(s.authz.is_empty());
        assert!(s.pending_action.is_none());
    }

    #[test]
    fn halt_resets_step_count() {
        let mut s = SessionState::new("s1");
        s.step_count = 7;
        assert_eq!(s.halted().step_count, 0);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let s = SessionState::new("s1").with_login(
            "p1".into(),
            Role::OrgAdmin,
            AuthzContext {
                org_id: Some("o1".into()),
                group_id: None,
            },
        );
        let json = serde_json::to_string(&s).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, Role::OrgAdmin);
        assert_eq!(back.identity.as_deref(), Some("p1"));
    }
}
