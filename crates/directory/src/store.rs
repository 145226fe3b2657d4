//! JSON-file-backed directory store.
//!
//! All collections live in one `directory.json` under the configured state
//! path. Reads and writes go through a `parking_lot::RwLock`; `flush`
//! persists the whole map. Per-document atomicity is all the workflow core
//! asks of this layer — there are no cross-entity transactions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use cf_domain::error::{Error, Result};
use cf_domain::principal::{Principal, Role};

use crate::entities::{Org, Quiz, Submission};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    principals: HashMap<String, Principal>,
    #[serde(default)]
    orgs: HashMap<String, Org>,
    #[serde(default)]
    quizzes: HashMap<String, Quiz>,
    #[serde(default)]
    submissions: HashMap<String, Submission>,
}

/// The directory store. Cheap to share behind an `Arc`.
pub struct Directory {
    /// `None` for in-memory stores (tests); `flush` is then a no-op.
    path: Option<PathBuf>,
    inner: RwLock<Collections>,
}

impl Directory {
    /// Load or create the directory at `state_path/directory.json`.
    pub fn open(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;
        let path = state_path.join("directory.json");

        let collections = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(Error::Io)?;
            serde_json::from_str(&raw)?
        } else {
            Collections::default()
        };

        tracing::info!(
            principals = collections.principals.len(),
            orgs = collections.orgs.len(),
            path = %path.display(),
            "directory loaded"
        );

        Ok(Self {
            path: Some(path),
            inner: RwLock::new(collections),
        })
    }

    /// An empty store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: RwLock::new(Collections::default()),
        }
    }

    /// Persist the current collections to disk.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let inner = self.inner.read();
        let json = serde_json::to_string_pretty(&*inner)?;
        std::fs::write(path, json).map_err(Error::Io)?;
        Ok(())
    }

    // ── Principals ──────────────────────────────────────────────────

    /// Fetch the active principal for an identity claim (email).
    ///
    /// At most one active principal holds an email at a time (enforced
    /// by [`Directory::insert_principal`]); deactivated holders of a
    /// reused email must never shadow the current one.
    pub fn find_principal_by_email(&self, email: &str) -> Option<Principal> {
        let email = email.trim().to_ascii_lowercase();
        self.inner
            .read()
            .principals
            .values()
            .find(|p| p.active && p.email == email)
            .cloned()
    }

    pub fn get_principal(&self, id: &str) -> Option<Principal> {
        self.inner.read().principals.get(id).cloned()
    }

    /// Insert a new principal. Fails with `Conflict` when an active
    /// principal already uses the same email.
    pub fn insert_principal(&self, mut principal: Principal) -> Result<()> {
        principal.email = principal.email.trim().to_ascii_lowercase();
        let mut inner = self.inner.write();
        let taken = inner
            .principals
            .values()
            .any(|p| p.active && p.email == principal.email);
        if taken {
            return Err(Error::Conflict(format!(
                "email already registered: {}",
                principal.email
            )));
        }
        inner.principals.insert(principal.id.clone(), principal);
        Ok(())
    }

    /// Soft-delete a principal. Returns `false` when the id is unknown
    /// or already inactive.
    pub fn deactivate_principal(&self, id: &str) -> bool {
        let mut inner = self.inner.write();
        match inner.principals.get_mut(id) {
            Some(p) if p.active => {
                p.active = false;
                true
            }
            _ => false,
        }
    }

    /// Active staff principals of one org, sorted by name.
    pub fn staff_in_org(&self, org_id: &str) -> Vec<Principal> {
        self.principals_where(|p| {
            p.active && p.role == Role::Staff && p.org_id.as_deref() == Some(org_id)
        })
    }

    /// Active members of one group within an org, sorted by name.
    pub fn members_in_group(&self, org_id: &str, group_id: &str) -> Vec<Principal> {
        self.principals_where(|p| {
            p.active
                && p.role == Role::Member
                && p.org_id.as_deref() == Some(org_id)
                && p.group_id.as_deref() == Some(group_id)
        })
    }

    fn principals_where(&self, pred: impl Fn(&Principal) -> bool) -> Vec<Principal> {
        let inner = self.inner.read();
        let mut out: Vec<Principal> = inner.principals.values().filter(|p| pred(p)).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    // ── Orgs ────────────────────────────────────────────────────────

    /// Insert a new org. Fails with `Conflict` when an active org already
    /// uses the same contact email.
    pub fn insert_org(&self, org: Org) -> Result<()> {
        let mut inner = self.inner.write();
        let taken = inner
            .orgs
            .values()
            .any(|o| o.active && o.contact_email == org.contact_email);
        if taken {
            return Err(Error::Conflict(format!(
                "org contact already registered: {}",
                org.contact_email
            )));
        }
        inner.orgs.insert(org.id.clone(), org);
        Ok(())
    }

    pub fn get_org(&self, id: &str) -> Option<Org> {
        self.inner.read().orgs.get(id).cloned()
    }

    /// Active orgs, sorted by name.
    pub fn list_orgs(&self) -> Vec<Org> {
        let inner = self.inner.read();
        let mut out: Vec<Org> = inner.orgs.values().filter(|o| o.active).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Soft-delete an org and every principal scoped to it, so stale
    /// logins stop verifying. Returns `false` for unknown/inactive ids.
    pub fn deactivate_org(&self, id: &str) -> bool {
        let mut inner = self.inner.write();
        match inner.orgs.get_mut(id) {
            Some(o) if o.active => {
                o.active = false;
            }
            _ => return false,
        }
        for p in inner.principals.values_mut() {
            if p.org_id.as_deref() == Some(id) {
                p.active = false;
            }
        }
        true
    }

    // ── Quizzes ─────────────────────────────────────────────────────

    pub fn insert_quiz(&self, quiz: Quiz) {
        self.inner.write().quizzes.insert(quiz.id.clone(), quiz);
    }

    pub fn get_quiz(&self, id: &str) -> Option<Quiz> {
        self.inner.read().quizzes.get(id).cloned()
    }

    /// Mark a quiz published. Author-scoped: someone else's quiz id is
    /// indistinguishable from an unknown one.
    pub fn publish_quiz(&self, quiz_id: &str, author_id: &str) -> Option<Quiz> {
        let mut inner = self.inner.write();
        let quiz = inner.quizzes.get_mut(quiz_id)?;
        if quiz.author_id != author_id {
            return None;
        }
        quiz.published = true;
        Some(quiz.clone())
    }

    /// Published quizzes visible to one group, newest first.
    pub fn published_quizzes(&self, org_id: &str, group_id: &str) -> Vec<Quiz> {
        let inner = self.inner.read();
        let mut out: Vec<Quiz> = inner
            .quizzes
            .values()
            .filter(|q| q.published && q.org_id == org_id && q.group_id == group_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    // ── Submissions ─────────────────────────────────────────────────

    pub fn insert_submission(&self, submission: Submission) {
        self.inner
            .write()
            .submissions
            .insert(submission.id.clone(), submission);
    }

    pub fn submissions_for_quiz(&self, quiz_id: &str) -> Vec<Submission> {
        let inner = self.inner.read();
        inner
            .submissions
            .values()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn principal(id: &str, email: &str, role: Role, org: Option<&str>) -> Principal {
        Principal {
            id: id.into(),
            name: format!("P {id}"),
            email: email.into(),
            password_hash: "x$y".into(),
            role,
            active: true,
            org_id: org.map(Into::into),
            group_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_active_email_conflicts() {
        let dir = Directory::in_memory();
        dir.insert_principal(principal("a", "a@x.co", Role::Staff, None))
            .unwrap();
        let err = dir
            .insert_principal(principal("b", "a@x.co", Role::Member, None))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn deactivated_email_can_be_reused() {
        let dir = Directory::in_memory();
        dir.insert_principal(principal("a", "a@x.co", Role::Staff, None))
            .unwrap();
        assert!(dir.deactivate_principal("a"));
        dir.insert_principal(principal("b", "a@x.co", Role::Staff, None))
            .unwrap();
    }

    #[test]
    fn deactivating_an_org_cascades_to_its_principals() {
        let dir = Directory::in_memory();
        dir.insert_org(Org {
            id: "o1".into(),
            name: "North".into(),
            contact_email: "n@x.co".into(),
            active: true,
            created_at: Utc::now(),
        })
        .unwrap();
        dir.insert_principal(principal("a", "a@x.co", Role::OrgAdmin, Some("o1")))
            .unwrap();
        dir.insert_principal(principal("b", "b@x.co", Role::Staff, Some("o1")))
            .unwrap();

        assert!(dir.deactivate_org("o1"));
        assert!(!dir.get_principal("a").unwrap().active);
        assert!(!dir.get_principal("b").unwrap().active);
        assert!(dir.list_orgs().is_empty());
        // Second deactivation is a no-op.
        assert!(!dir.deactivate_org("o1"));
    }

    #[test]
    fn scoped_listings_exclude_other_orgs() {
        let dir = Directory::in_memory();
        dir.insert_principal(principal("a", "a@x.co", Role::Staff, Some("o1")))
            .unwrap();
        dir.insert_principal(principal("b", "b@x.co", Role::Staff, Some("o2")))
            .unwrap();

        let staff = dir.staff_in_org("o1");
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].id, "a");
    }

    #[test]
    fn persists_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let dir = Directory::open(tmp.path()).unwrap();
            dir.insert_principal(principal("a", "a@x.co", Role::Tier1Admin, None))
                .unwrap();
            dir.flush().unwrap();
        }
        let dir = Directory::open(tmp.path()).unwrap();
        assert!(dir.get_principal("a").is_some());
    }
}
