use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Role
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Closed set of roles a session can run as.
///
/// `role` is always derived from the directory record at login — it is
/// never taken from client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Unauthenticated,
    Tier1Admin,
    OrgAdmin,
    Staff,
    Member,
}

impl Role {
    /// Wire name of the role (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unauthenticated => "unauthenticated",
            Role::Tier1Admin => "tier1_admin",
            Role::OrgAdmin => "org_admin",
            Role::Staff => "staff",
            Role::Member => "member",
        }
    }

    /// All roles that can hold an authenticated session.
    pub const AUTHENTICATED: [Role; 4] =
        [Role::Tier1Admin, Role::OrgAdmin, Role::Staff, Role::Member];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Principal
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A directory record for anyone who can log in.
///
/// Removal is a soft delete (`active = false`); inactive principals are
/// invisible to credential verification and to scoped listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Salted hash of the secret, `"<salt_hex>$<digest_hex>"`.
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    /// Org the principal is scoped to. `None` for tier1 admins.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Assigned group (staff) or enrollment group (members).
    #[serde(default)]
    pub group_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Authorization context
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Scoping attributes restricting what an authenticated principal's
/// actions may touch. Populated by the resolver at login, empty for
/// tier1 admins, and cleared on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuthzContext {
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

impl AuthzContext {
    pub fn is_empty(&self) -> bool {
        self.org_id.is_none() && self.group_id.is_none()
    }

    /// One-line summary for the invocation response.
    pub fn summary(&self) -> String {
        match (&self.org_id, &self.group_id) {
            (None, None) => "-".into(),
            (Some(org), None) => format!("org={org}"),
            (None, Some(group)) => format!("group={group}"),
            (Some(org), Some(group)) => format!("org={org} group={group}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names_match_serde() {
        for role in Role::AUTHENTICATED {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn empty_context_summary_is_dash() {
        assert_eq!(AuthzContext::default().summary(), "-");
    }

    #[test]
    fn scoped_context_summary_lists_both() {
        let ctx = AuthzContext {
            org_id: Some("o1".into()),
            group_id: Some("g7".into()),
        };
        assert_eq!(ctx.summary(), "org=o1 group=g7");
    }
}
