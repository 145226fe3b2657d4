//! Authorization-context resolution.
//!
//! Re-derived at every login from the current directory record, never
//! cached beyond the session: a staff member reassigned to another group
//! picks up the new scope on their next login.

use std::sync::Arc;

use cf_domain::error::{Error, Result};
use cf_domain::principal::{AuthzContext, Principal, Role};

use crate::store::Directory;

pub struct AuthzResolver {
    directory: Arc<Directory>,
}

impl AuthzResolver {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }

    /// Derive `(role, context)` for a freshly authenticated principal.
    ///
    /// The record is re-fetched by id so that a reassignment committed
    /// between verification and resolution is still honored.
    pub fn resolve(&self, principal: &Principal) -> Result<(Role, AuthzContext)> {
        let current = self
            .directory
            .get_principal(&principal.id)
            .ok_or_else(|| Error::Auth(format!("principal vanished: {}", principal.id)))?;

        let ctx = match current.role {
            Role::Unauthenticated => {
                return Err(Error::Auth("directory record has no role".into()))
            }
            Role::Tier1Admin => AuthzContext::default(),
            Role::OrgAdmin => AuthzContext {
                org_id: Some(require(&current, current.org_id.clone(), "org_id")?),
                group_id: None,
            },
            Role::Staff | Role::Member => AuthzContext {
                org_id: Some(require(&current, current.org_id.clone(), "org_id")?),
                group_id: Some(require(&current, current.group_id.clone(), "group_id")?),
            },
        };

        tracing::debug!(
            principal = %current.id,
            role = %current.role,
            context = %ctx.summary(),
            "authorization context resolved"
        );
        Ok((current.role, ctx))
    }
}

fn require(p: &Principal, field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| {
        Error::Auth(format!(
            "principal {} has role {} but no {name}",
            p.id, p.role
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn seeded(role: Role, org: Option<&str>, group: Option<&str>) -> (AuthzResolver, Principal) {
        let dir = Arc::new(Directory::in_memory());
        let p = Principal {
            id: "p1".into(),
            name: "Ana".into(),
            email: "ana@x.co".into(),
            password_hash: "x$y".into(),
            role,
            active: true,
            org_id: org.map(Into::into),
            group_id: group.map(Into::into),
            created_at: Utc::now(),
        };
        dir.insert_principal(p.clone()).unwrap();
        (AuthzResolver::new(dir), p)
    }

    #[test]
    fn tier1_admin_context_is_empty() {
        let (resolver, p) = seeded(Role::Tier1Admin, None, None);
        let (role, ctx) = resolver.resolve(&p).unwrap();
        assert_eq!(role, Role::Tier1Admin);
        assert!(ctx.is_empty());
    }

    #[test]
    fn org_admin_context_carries_their_org() {
        let (resolver, p) = seeded(Role::OrgAdmin, Some("o1"), None);
        let (_, ctx) = resolver.resolve(&p).unwrap();
        assert_eq!(ctx.org_id.as_deref(), Some("o1"));
        assert!(ctx.group_id.is_none());
    }

    #[test]
    fn staff_context_carries_org_and_group() {
        let (resolver, p) = seeded(Role::Staff, Some("o1"), Some("g2"));
        let (_, ctx) = resolver.resolve(&p).unwrap();
        assert_eq!(ctx.org_id.as_deref(), Some("o1"));
        assert_eq!(ctx.group_id.as_deref(), Some("g2"));
    }

    #[test]
    fn staff_without_group_fails_resolution() {
        let (resolver, p) = seeded(Role::Staff, Some("o1"), None);
        assert!(resolver.resolve(&p).is_err());
    }

    #[test]
    fn resolution_sees_directory_changes_since_verification() {
        let dir = Arc::new(Directory::in_memory());
        let stale = Principal {
            id: "p1".into(),
            name: "Ana".into(),
            email: "ana@x.co".into(),
            password_hash: "x$y".into(),
            role: Role::Member,
            active: true,
            org_id: Some("o1".into()),
            group_id: Some("g-old".into()),
            created_at: Utc::now(),
        };
        let mut current = stale.clone();
        current.group_id = Some("g-new".into());
        dir.insert_principal(current).unwrap();

        let resolver = AuthzResolver::new(dir);
        let (_, ctx) = resolver.resolve(&stale).unwrap();
        assert_eq!(ctx.group_id.as_deref(), Some("g-new"));
    }
}
