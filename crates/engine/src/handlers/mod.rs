//! Action handlers, grouped by the role that owns them.

pub mod admin;
pub mod member;
pub mod org;
pub mod staff;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use cf_domain::error::{Error, Result};

use crate::registry::{ActionKind, ActionRegistry};

/// Wire every action to its production handler. Fails when the table is
/// not total — which is a bug caught at startup, not at dispatch.
pub fn default_registry() -> Result<ActionRegistry> {
    ActionRegistry::builder()
        .register(ActionKind::AddOrg, Arc::new(admin::AddOrg))
        .register(ActionKind::ListOrgs, Arc::new(admin::ListOrgs))
        .register(ActionKind::RemoveOrg, Arc::new(admin::RemoveOrg))
        .register(ActionKind::AddStaff, Arc::new(org::AddStaff))
        .register(ActionKind::ListStaff, Arc::new(org::ListStaff))
        .register(ActionKind::RemoveStaff, Arc::new(org::RemoveStaff))
        .register(ActionKind::AddMember, Arc::new(staff::AddMember))
        .register(ActionKind::ListMembers, Arc::new(staff::ListMembers))
        .register(ActionKind::GenerateQuiz, Arc::new(staff::GenerateQuiz))
        .register(ActionKind::PublishQuiz, Arc::new(staff::PublishQuiz))
        .register(ActionKind::ListQuizzes, Arc::new(member::ListQuizzes))
        .register(ActionKind::SubmitQuiz, Arc::new(member::SubmitQuiz))
        .register(ActionKind::AskDocument, Arc::new(member::AskDocument))
        .build()
}

/// Deserialize the turn's payload into a handler's expected shape.
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Result<T> {
    serde_json::from_value(payload.clone())
        .map_err(|e| Error::Other(format!("invalid payload shape: {e}")))
}

/// The org id this request is scoped to; absent for roles that should
/// never reach an org-scoped handler.
pub(crate) fn require_org(authz: &cf_domain::principal::AuthzContext) -> Result<&str> {
    authz
        .org_id
        .as_deref()
        .ok_or_else(|| Error::Auth("authorization context has no org scope".into()))
}

pub(crate) fn require_group(authz: &cf_domain::principal::AuthzContext) -> Result<&str> {
    authz
        .group_id
        .as_deref()
        .ok_or_else(|| Error::Auth("authorization context has no group scope".into()))
}
